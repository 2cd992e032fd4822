//! Schematic gene-cluster diagrams: ORF arrows and nested domain boxes laid
//! out as pixel-space polygons, ready for any polygon-drawing surface.

pub mod layout;
pub mod model;
pub mod random;

pub use layout::{
    arrow_polygon, domain_polygon, flip_horizontal, layout_cluster, to_point_string,
    ClusterLayout, Glyph, GlyphKind, GlyphStyle, HitTarget, Point, Scaler,
};
pub use model::{Cluster, Domain, LayoutError, Orf, Strand};
pub use random::random_cluster;
