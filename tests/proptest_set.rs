use afids::model::io_fcsv::{from_fcsv_str, to_fcsv_string};
use afids::model::io_markup_json::{from_markup_json_str, to_markup_json_string};
use afids::model::{CoordinateSystem, FiducialSet};
use afids::AfidsError;
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn set_orders_any_permutation_by_label(positions in proptest_helpers::arb_shuffled_positions()) {
        let set = FiducialSet::new("4.13", CoordinateSystem::Ras, positions).expect("complete set");
        let labels: Vec<u32> = set.iter().map(|f| f.label()).collect();
        prop_assert_eq!(labels, (1..=32).collect::<Vec<_>>());
    }

    #[test]
    fn set_rejects_wrong_count(positions in proptest_helpers::arb_positions(), drop in 0usize..32) {
        let mut positions = positions;
        positions.remove(drop);
        let err = FiducialSet::new("4.13", CoordinateSystem::Ras, positions).unwrap_err();
        let is_count_error = matches!(err, AfidsError::IncorrectFiducialCount { expected: 32, found: 31 });
        prop_assert!(is_count_error);
    }

    #[test]
    fn set_rejects_duplicated_label(positions in proptest_helpers::arb_positions(), dup in 1usize..32) {
        let mut positions = positions;
        positions[dup] = positions[0].clone();
        let err = FiducialSet::new("4.13", CoordinateSystem::Ras, positions).unwrap_err();
        match err {
            AfidsError::IncorrectFiducialLabels { mismatches } => prop_assert!(!mismatches.is_empty()),
            other => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn fcsv_roundtrip_preserves_coordinates(set in proptest_helpers::arb_set()) {
        let text = to_fcsv_string(&set).expect("serialize fcsv");
        let restored = from_fcsv_str(&text)
            .expect("parse fcsv")
            .into_fiducial_set(std::path::Path::new("<string>"))
            .expect("valid set");

        prop_assert_eq!(restored.coord_system(), set.coord_system());
        let res = proptest_helpers::assert_coords_close(&set, &restored, 0.0);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
    }

    #[test]
    fn markup_json_roundtrip_preserves_coordinates(set in proptest_helpers::arb_set()) {
        let text = to_markup_json_string(&set).expect("serialize json");
        let restored = from_markup_json_str(&text)
            .expect("parse json")
            .into_fiducial_set(std::path::Path::new("<string>"))
            .expect("valid set");

        prop_assert_eq!(restored.coord_system(), set.coord_system());
        let res = proptest_helpers::assert_coords_close(&set, &restored, proptest_helpers::EPS_MARKUP_JSON);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
    }
}
