mod util;

use mesh_surgery::prelude::*;
use util::{counts, x_periodic_box};

#[test]
fn config_fills_missing_fields_with_defaults() {
    let config: SurgeryConfig =
        serde_json::from_str(r#"{ "scratch_prefix": "feflo_", "twin_match": "FirstMatch" }"#).unwrap();
    assert_eq!(config.scratch_prefix, "feflo_");
    assert_eq!(config.twin_match, TwinMatchPolicy::FirstMatch);
    assert_eq!(config.periodic_family, SurgeryConfig::default().periodic_family);
    assert!(config.is_scratch("feflo_region"));
    assert!(!config.is_scratch("remesh_region"));
}

#[test]
fn unroll_record_survives_the_remesher_round_trip() {
    let (mut zone, pairings) = x_periodic_box(2);
    let original = counts(&zone);
    let config = SurgeryConfig::default();
    let record = unroll_periodic_pairings(&mut zone, &pairings, &config).unwrap();

    let saved = serde_json::to_string(&record).unwrap();
    let restored: UnrollRecord = serde_json::from_str(&saved).unwrap();
    assert_eq!(restored, record);

    fold_back(&mut zone, &restored, &config).unwrap();
    assert_eq!(counts(&zone), original);
}

#[test]
fn pairing_transform_is_plain_data() {
    let pairing = PeriodicPairing::new(
        "Left",
        "Right",
        PeriodicTransform::rotation([0.0, 0.0, 0.0], [0.0, 0.0, 0.5]).with_translation([1.0, 0.0, 0.0]),
    );
    let json = serde_json::to_value(&pairing).unwrap();
    assert_eq!(json["transform"]["translation"][0], 1.0);
    let back: PeriodicPairing = serde_json::from_value(json).unwrap();
    assert_eq!(back, pairing);
}
