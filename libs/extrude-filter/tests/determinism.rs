mod common;

use common::{building, init_tracing, mixed_sheet};
use config::constants::ExtrudeConfig;
use extrude_filter::{
    seeded_rng, ExtrudeGeometryFilter, ExtrudedGroup, ExtrusionSymbol, FilterContext,
    SimpleFeature, StateKey, Style,
};

fn features() -> Vec<SimpleFeature> {
    (0..40).map(|i| building(i, i as f64 * 12.0, 1 + (i % 7) as i32)).collect()
}

fn run(parallel: bool, merge: bool, seed: u64) -> ExtrudedGroup {
    init_tracing();
    let mut filter = ExtrudeGeometryFilter::new();
    filter.set_style(Style::new("b").with_extrusion(ExtrusionSymbol {
        height_expression: Some("[levels] * 3".parse().unwrap()),
        wall_style: Some("walls".into()),
        ..Default::default()
    }));
    filter.set_config(ExtrudeConfig::new(60.0, merge, parallel).unwrap());
    let styles = mixed_sheet();
    filter.push(&features(), &FilterContext::with_styles(&styles), &mut seeded_rng(seed))
}

#[test]
fn parallel_matches_sequential() {
    for merge in [false, true] {
        assert_eq!(run(true, merge, 11), run(false, merge, 11));
    }
}

#[test]
fn same_seed_same_skins() {
    let a = run(false, false, 5);
    let b = run(false, false, 5);
    assert_eq!(a, b);

    // four interchangeable skins over forty features: all of them show up
    let skins = a
        .buckets
        .iter()
        .filter(|b| matches!(b.key, StateKey::Skin(_)))
        .count();
    assert_eq!(skins, 4);
    let walls: usize = a
        .buckets
        .iter()
        .filter(|b| b.key != StateKey::Untextured)
        .map(|b| b.meshes.len())
        .sum();
    assert_eq!(walls, 40);
}
