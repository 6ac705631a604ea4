#![allow(dead_code)]

use afids::model::{CoordinateSystem, FiducialPosition, FiducialSet};
use afids::protocol::ProtocolMap;
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Coordinates are kept within a head-sized box (millimetres).
pub const COORD_RANGE: f64 = 150.0;

// serde_json float parsing is not always correctly rounded
pub const EPS_MARKUP_JSON: f64 = 1e-9;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_coord() -> BoxedStrategy<f64> {
    (-COORD_RANGE..COORD_RANGE).boxed()
}

pub fn arb_xyz() -> BoxedStrategy<[f64; 3]> {
    (arb_coord(), arb_coord(), arb_coord())
        .prop_map(|(x, y, z)| [x, y, z])
        .boxed()
}

pub fn arb_coord_system() -> BoxedStrategy<CoordinateSystem> {
    prop_oneof![Just(CoordinateSystem::Ras), Just(CoordinateSystem::Lps)].boxed()
}

/// One position per protocol label, in label order.
pub fn arb_positions() -> BoxedStrategy<Vec<FiducialPosition>> {
    prop::collection::vec(arb_xyz(), 32)
        .prop_map(|coords| {
            let protocol = ProtocolMap::load().expect("bundled protocol");
            protocol
                .entries()
                .iter()
                .zip(coords)
                .map(|(entry, [x, y, z])| {
                    FiducialPosition::new(entry.label as i64, x, y, z, entry.desc.clone())
                        .expect("protocol entry is valid")
                })
                .collect()
        })
        .boxed()
}

pub fn arb_set() -> BoxedStrategy<FiducialSet> {
    (arb_positions(), arb_coord_system())
        .prop_map(|(positions, coord_system)| {
            FiducialSet::new("4.13", coord_system, positions).expect("complete set")
        })
        .boxed()
}

/// Positions shuffled into an arbitrary order.
pub fn arb_shuffled_positions() -> BoxedStrategy<Vec<FiducialPosition>> {
    arb_positions().prop_shuffle().boxed()
}

pub fn assert_coords_close(a: &FiducialSet, b: &FiducialSet, eps: f64) -> Result<(), String> {
    for (fa, fb) in a.iter().zip(b.iter()) {
        if fa.label() != fb.label() {
            return Err(format!("label {} paired with {}", fa.label(), fb.label()));
        }
        for (axis, (ca, cb)) in fa.coords().iter().zip(fb.coords()).enumerate() {
            if (ca - cb).abs() > eps {
                return Err(format!(
                    "label {} axis {}: {} vs {} (eps {})",
                    fa.label(),
                    axis,
                    ca,
                    cb,
                    eps
                ));
            }
        }
    }
    Ok(())
}
