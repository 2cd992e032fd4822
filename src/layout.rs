use crate::model::{validate_domain, validate_orf, Cluster, Domain, LayoutError, Orf, Strand};

/// Base pairs mapped onto one diagram height worth of pixels: a diagram of
/// height `h` renders `1000 / h` base pairs per pixel column.
const BASES_PER_HEIGHT: i64 = 1000;

const BACKBONE_STROKE_WIDTH: f64 = 2.0;
const ORF_STROKE_WIDTH: f64 = 2.0;
const DEFAULT_ORF_FILL: &str = "white";
const DEFAULT_DOMAIN_FILL: &str = "gray";

/// A pixel-space coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Maps genomic base-pair deltas to pixel lengths for a given diagram height.
///
/// Truncation to whole pixels is intentional (pixel snapping), so `px` is
/// monotonically non-decreasing but not linear.
#[derive(Clone, Copy, Debug)]
pub struct Scaler {
    height: i64,
}

impl Scaler {
    pub fn new(height: i64) -> Self {
        Self { height }
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    /// Pixel length of a genomic span: `floor(delta_bp * height / 1000)`.
    pub fn px(&self, delta_bp: i64) -> i64 {
        (delta_bp * self.height).div_euclid(BASES_PER_HEIGHT)
    }
}

/// Pixel frame of one ORF: x landmarks plus the y levels of its outline,
/// always in the unflipped (pointing-right) orientation.
struct OrfFrame {
    x0: i64,
    x1: i64,
    x2: i64,
    mid: f64,
    body_top: f64,
    body_bottom: f64,
    barb_top: f64,
    barb_bottom: f64,
}

fn orf_frame(orf: &Orf, cluster: &Cluster, scaler: &Scaler) -> OrfFrame {
    let len_bp = orf.len_bp();
    let height = scaler.height();
    let x0 = scaler.px(orf.start - cluster.start);
    let x_len = scaler.px(len_bp);
    let x2 = x0 + x_len;
    let x1 = if orf.strand.is_directed() {
        // The arrowhead is at most height/2 pixels long and at most a quarter
        // of the rendered body, whichever leaves the longer neck.
        let three_quarters = (3 * len_bp * height).div_euclid(4 * BASES_PER_HEIGHT);
        x0 + three_quarters.max(x_len - height / 2)
    } else {
        x2
    };

    let h = height as f64;
    let mid = h / 2.0;
    let body_top = mid - h / 3.0;
    let body_bottom = mid + h / 3.0;
    let barb = if orf.strand.is_directed() { h / 5.0 } else { 0.0 };

    OrfFrame {
        x0,
        x1,
        x2,
        mid,
        body_top,
        body_bottom,
        barb_top: body_top - barb,
        barb_bottom: body_bottom + barb,
    }
}

/// The 7 arrow vertices in unflipped orientation, tracing blunt-start-top,
/// neck-top, neck-top-barb, tip, neck-bottom-barb, neck-bottom,
/// blunt-start-bottom.
fn arrow_points_unflipped(frame: &OrfFrame) -> Vec<Point> {
    let x0 = frame.x0 as f64;
    let x1 = frame.x1 as f64;
    let x2 = frame.x2 as f64;
    vec![
        Point { x: x0, y: frame.body_top },
        Point { x: x1, y: frame.body_top },
        Point { x: x1, y: frame.barb_top },
        Point { x: x2, y: frame.mid },
        Point { x: x1, y: frame.barb_bottom },
        Point { x: x1, y: frame.body_bottom },
        Point { x: x0, y: frame.body_bottom },
    ]
}

/// Build the 7-vertex arrow polygon for one ORF. Reverse-strand ORFs are
/// mirrored across their own pixel span so the arrowhead points left; blunt
/// ORFs keep the same vertex structure with the neck collapsed onto the tip.
pub fn arrow_polygon(
    orf: &Orf,
    cluster: &Cluster,
    scaler: &Scaler,
) -> Result<Vec<Point>, LayoutError> {
    validate_orf(orf, cluster)?;
    let frame = orf_frame(orf, cluster, scaler);
    let points = arrow_points_unflipped(&frame);
    if orf.strand == Strand::Reverse {
        return flip_horizontal(&points, frame.x0 as f64, frame.x2 as f64);
    }
    Ok(points)
}

/// Build the 8-vertex polygon of a domain clipped to its parent arrow.
///
/// The parent outline is computed unflipped with the tip vertex duplicated,
/// giving symmetric upper (0..=3) and lower (4..=7) vertex runs; each vertex's
/// x is clamped to the domain's pixel span and its y follows the arrow's
/// outline there. Mirroring for reverse strands is applied last.
pub fn domain_polygon(
    domain: &Domain,
    orf: &Orf,
    cluster: &Cluster,
    scaler: &Scaler,
) -> Result<Vec<Point>, LayoutError> {
    validate_orf(orf, cluster)?;
    validate_domain(domain, orf)?;

    let frame = orf_frame(orf, cluster, scaler);
    let mut arrow = arrow_points_unflipped(&frame);
    arrow.insert(3, arrow[3]);

    // Amino-acid coordinates become nucleotide spans before scaling.
    let x_start = (frame.x0 + scaler.px(domain.start * 3)) as f64;
    let x_end = (frame.x0 + scaler.px(domain.end * 3)) as f64;

    let neck_x = arrow[1].x;
    let tip = arrow[3];
    let lower_barb = arrow[5];
    let dx = (lower_barb.x - tip.x).abs();
    // A vertical neck-to-tip edge degenerates to slope 0, not an error.
    let slope = if dx == 0.0 {
        0.0
    } else {
        (lower_barb.y - tip.y).abs() / dx
    };
    let taper_rise = |x: f64| slope * (x - tip.x);

    let margin = scaler.height() as f64 / 20.0;
    let top_bound = arrow[0].y;
    let bottom_bound = arrow[7].y;

    let mut points = Vec::with_capacity(arrow.len());
    for (i, apt) in arrow.iter().enumerate() {
        let x = if apt.x < x_start {
            x_start
        } else if apt.x > x_end {
            x_end
        } else {
            apt.x
        };
        let y = if x < neck_x {
            // Left of the neck the domain box has straight vertical sides.
            apt.y.max(top_bound).min(bottom_bound)
        } else if x == neck_x {
            // On the neck itself the barb corner passes through unchanged.
            apt.y
        } else if i < 4 {
            tip.y + taper_rise(x)
        } else {
            tip.y - taper_rise(x)
        };
        let y = if i < 4 { y + margin } else { y - margin };
        points.push(Point { x, y });
    }

    if orf.strand == Strand::Reverse {
        return flip_horizontal(&points, frame.x0 as f64, frame.x2 as f64);
    }
    Ok(points)
}

/// Mirror points across the vertical axis centered in `[left, right]`.
///
/// Every input x must lie within the bounds; a violation is a logic error in
/// the caller and is reported rather than dropping the vertex.
pub fn flip_horizontal(
    points: &[Point],
    left: f64,
    right: f64,
) -> Result<Vec<Point>, LayoutError> {
    points
        .iter()
        .map(|point| {
            if point.x < left || point.x > right {
                return Err(LayoutError::InvalidBounds {
                    x: point.x,
                    left,
                    right,
                });
            }
            Ok(Point {
                x: right - (point.x - left),
                y: point.y,
            })
        })
        .collect()
}

/// Render points as the comma/space-delimited list SVG `<polygon points=...>`
/// expects, with each coordinate truncated to an integer.
pub fn to_point_string(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!(
            "{},{}",
            point.x.trunc() as i64,
            point.y.trunc() as i64
        ));
    }
    out
}

/// What a glyph depicts; drawing order in [`ClusterLayout::glyphs`] is
/// backbone, then each ORF arrow followed by its domain boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphKind {
    Backbone,
    Orf,
    Domain,
}

#[derive(Clone, Debug)]
pub struct GlyphStyle {
    pub fill: String,
    pub stroke_width: f64,
}

/// Owned snapshot of the record a glyph depicts. Hover handlers resolve
/// against this snapshot, never against an index into shared state.
#[derive(Clone, Debug)]
pub enum HitTarget {
    Cluster {
        id: Option<String>,
        desc: Option<String>,
    },
    Orf(Orf),
    Domain(Domain),
}

impl HitTarget {
    /// Hover text for the tooltip sink, matching the widget's HTML payloads.
    pub fn tooltip_html(&self) -> String {
        match self {
            HitTarget::Cluster { id, desc } => {
                let mut text = format!("<b>BGC: {}</b>", id.as_deref().unwrap_or(""));
                if let Some(desc) = desc {
                    text.push_str(&format!("<br /> {desc}"));
                }
                text
            }
            HitTarget::Orf(orf) => {
                format!("ORF: {}<br/>{} - {}", orf.id, orf.start, orf.end)
            }
            HitTarget::Domain(domain) => format!(
                "Domain: {} ({})<br/>{} - {}",
                domain.code, domain.bitscore, domain.start, domain.end
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Glyph {
    pub kind: GlyphKind,
    pub polygon: Vec<Point>,
    pub style: GlyphStyle,
    pub target: HitTarget,
}

/// Render-ready output of [`layout_cluster`].
#[derive(Clone, Debug)]
pub struct ClusterLayout {
    pub width: i64,
    pub height: i64,
    pub glyphs: Vec<Glyph>,
}

/// Lay out a whole cluster at the given diagram height.
///
/// Validates every record invariant up front, then emits the backbone line
/// and one polygon glyph per ORF and per domain, each carrying its fill
/// style and an owned hit-target snapshot for the event layer.
pub fn layout_cluster(cluster: &Cluster, height: i64) -> Result<ClusterLayout, LayoutError> {
    cluster.validate()?;

    let scaler = Scaler::new(height);
    let width = scaler.px(cluster.end - cluster.start);
    let backbone_y = (height / 2) as f64;

    let mut glyphs = vec![Glyph {
        kind: GlyphKind::Backbone,
        polygon: vec![
            Point { x: 0.0, y: backbone_y },
            Point { x: width as f64, y: backbone_y },
        ],
        style: GlyphStyle {
            fill: "none".to_string(),
            stroke_width: BACKBONE_STROKE_WIDTH,
        },
        target: HitTarget::Cluster {
            id: cluster.id.clone(),
            desc: cluster.desc.clone(),
        },
    }];

    for orf in &cluster.orfs {
        glyphs.push(Glyph {
            kind: GlyphKind::Orf,
            polygon: arrow_polygon(orf, cluster, &scaler)?,
            style: GlyphStyle {
                fill: orf
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ORF_FILL.to_string()),
                stroke_width: ORF_STROKE_WIDTH,
            },
            target: HitTarget::Orf(orf.clone()),
        });
        for domain in &orf.domains {
            glyphs.push(Glyph {
                kind: GlyphKind::Domain,
                polygon: domain_polygon(domain, orf, cluster, &scaler)?,
                style: GlyphStyle {
                    fill: domain
                        .color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DOMAIN_FILL.to_string()),
                    stroke_width: 0.0,
                },
                target: HitTarget::Domain(domain.clone()),
            });
        }
    }

    Ok(ClusterLayout {
        width,
        height,
        glyphs,
    })
}
