use rand::rngs::StdRng;
use rand::SeedableRng;

use render_bgc_rs::{
    arrow_polygon, layout_cluster, random_cluster, to_point_string, Cluster, GlyphKind,
    HitTarget, Orf, Scaler, Strand,
};

const HEIGHT: i64 = 40;

fn sample_cluster() -> Cluster {
    serde_json::from_str(
        r#"{
            "id": "BGC0000001",
            "desc": "test polyketide cluster",
            "start": 0,
            "end": 1000,
            "orfs": [
                {
                    "id": "orf1", "start": 0, "end": 300, "strand": 1,
                    "color": "rgb(120,40,200)",
                    "domains": [
                        {"code": "PF00109", "start": 0, "end": 50, "bitscore": 240.5},
                        {"code": "PF02801", "start": 60, "end": 95, "bitscore": 88.0}
                    ]
                },
                {"id": "orf2", "start": 400, "end": 700, "strand": -1},
                {"id": "orf3", "start": 800, "end": 1000, "strand": 0}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn sample_cluster_lays_out_with_expected_width_and_order() {
    let layout = layout_cluster(&sample_cluster(), HEIGHT).unwrap();
    assert_eq!(layout.width, 40);

    let kinds: Vec<GlyphKind> = layout.glyphs.iter().map(|g| g.kind).collect();
    assert_eq!(
        kinds,
        vec![
            GlyphKind::Backbone,
            GlyphKind::Orf,
            GlyphKind::Domain,
            GlyphKind::Domain,
            GlyphKind::Orf,
            GlyphKind::Orf,
        ]
    );

    // backbone spans the full diagram at mid-height
    let backbone = &layout.glyphs[0];
    assert_eq!(backbone.polygon[0].x, 0.0);
    assert_eq!(backbone.polygon[1].x, 40.0);
    assert_eq!(backbone.polygon[0].y, 20.0);
}

#[test]
fn glyph_targets_are_record_snapshots() {
    let layout = layout_cluster(&sample_cluster(), HEIGHT).unwrap();

    match &layout.glyphs[0].target {
        HitTarget::Cluster { id, desc } => {
            assert_eq!(id.as_deref(), Some("BGC0000001"));
            assert_eq!(desc.as_deref(), Some("test polyketide cluster"));
        }
        other => panic!("expected cluster target, got {other:?}"),
    }

    match &layout.glyphs[2].target {
        HitTarget::Domain(domain) => {
            assert_eq!(domain.code, "PF00109");
            assert_eq!(domain.bitscore, 240.5);
            assert_eq!(
                layout.glyphs[2].target.tooltip_html(),
                "Domain: PF00109 (240.5)<br/>0 - 50"
            );
        }
        other => panic!("expected domain target, got {other:?}"),
    }

    match &layout.glyphs[4].target {
        HitTarget::Orf(orf) => {
            assert_eq!(orf.id, "orf2");
            assert_eq!(orf.strand, Strand::Reverse);
        }
        other => panic!("expected ORF target, got {other:?}"),
    }
}

#[test]
fn reverse_orf_glyph_mirrors_its_forward_twin() {
    let cluster = sample_cluster();
    let scaler = Scaler::new(HEIGHT);
    let mut forward_twin = cluster.orfs[1].clone();
    forward_twin.strand = Strand::Forward;

    let rev = arrow_polygon(&cluster.orfs[1], &cluster, &scaler).unwrap();
    let fwd = arrow_polygon(&forward_twin, &cluster, &scaler).unwrap();

    let left = scaler.px(400) as f64;
    let right = (scaler.px(400) + scaler.px(300)) as f64;
    for (r, f) in rev.iter().zip(fwd.iter()) {
        assert_eq!(r.x, right - (f.x - left));
        assert_eq!(r.y, f.y);
    }
}

#[test]
fn blunt_orf_serializes_to_rectangle_point_string() {
    let cluster = sample_cluster();
    let scaler = Scaler::new(HEIGHT);
    let points = arrow_polygon(&cluster.orfs[2], &cluster, &scaler).unwrap();
    // 800..1000 bp at height 40: x from 32 to 40, body from y=6 to y=33
    assert_eq!(
        to_point_string(&points),
        "32,6, 40,6, 40,6, 40,20, 40,33, 40,33, 32,33"
    );
}

#[test]
fn invalid_records_fail_loudly() {
    let mut cluster = sample_cluster();
    cluster.orfs[0].end = 1200; // past the cluster
    assert!(layout_cluster(&cluster, HEIGHT).is_err());

    let mut cluster = sample_cluster();
    cluster.orfs[0].domains[0].end = 150; // 450 nt, past the 300 bp ORF
    assert!(layout_cluster(&cluster, HEIGHT).is_err());
}

#[test]
fn cluster_json_roundtrip_preserves_layout() {
    let cluster = sample_cluster();
    let json = serde_json::to_string(&cluster).unwrap();
    let reparsed: Cluster = serde_json::from_str(&json).unwrap();
    let a = layout_cluster(&cluster, HEIGHT).unwrap();
    let b = layout_cluster(&reparsed, HEIGHT).unwrap();
    assert_eq!(a.width, b.width);
    assert_eq!(a.glyphs.len(), b.glyphs.len());
    for (ga, gb) in a.glyphs.iter().zip(b.glyphs.iter()) {
        assert_eq!(ga.polygon, gb.polygon);
    }
}

#[test]
fn random_clusters_always_lay_out() {
    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let cluster = random_cluster(&mut rng);
        let layout = layout_cluster(&cluster, HEIGHT).unwrap();
        let width = layout.width as f64;

        let scaler = Scaler::new(HEIGHT);
        let mut current_orf: Option<Orf> = None;
        for glyph in &layout.glyphs {
            match glyph.kind {
                GlyphKind::Backbone => assert_eq!(glyph.polygon.len(), 2),
                GlyphKind::Orf => {
                    assert_eq!(glyph.polygon.len(), 7);
                    if let HitTarget::Orf(orf) = &glyph.target {
                        current_orf = Some(orf.clone());
                    }
                }
                GlyphKind::Domain => {
                    assert_eq!(glyph.polygon.len(), 8);
                    // domain glyphs stay inside their parent ORF's pixel span
                    let orf = current_orf.as_ref().expect("domain before any ORF");
                    let x0 = scaler.px(orf.start - cluster.start) as f64;
                    let x2 = x0 + scaler.px(orf.len_bp()) as f64;
                    for point in &glyph.polygon {
                        assert!(point.x >= x0 && point.x <= x2);
                    }
                }
            }
            for point in &glyph.polygon {
                assert!(point.x >= 0.0 && point.x <= width);
            }
        }
    }
}
