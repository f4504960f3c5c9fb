use linesim_core::config::{IntersectionCfg, SensorCfg};
use linesim_core::error::BuildError;
use linesim_core::{SensorArray, SensorArrayBuilder, SensorKind, ThreeSensorFollow};
use linesim_traits::DVec2;
use rstest::rstest;

#[rstest]
fn sensor_array_radii_mismatch_yields_typed_build_error() {
    let kinds = [SensorKind::Analog; 2];
    let err = SensorArray::try_new(2, DVec2::ZERO, vec![DVec2::ZERO; 2], &[5.0], &kinds)
        .expect_err("should fail with SensorCount");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::SensorCount {
            what: "radii",
            expected: 2,
            got: 1,
        }) => {}
        other => panic!("expected SensorCount, got: {other:?}"),
    }
}

#[rstest]
fn sensor_cfg_with_short_kinds_is_rejected() {
    let mut cfg = SensorCfg::default();
    cfg.kinds.pop();
    let err = SensorArrayBuilder::from_cfg(&cfg)
        .try_build()
        .expect_err("kinds too short");
    assert_eq!(
        err.downcast_ref::<BuildError>(),
        Some(&BuildError::SensorCount {
            what: "kinds",
            expected: 3,
            got: 2
        })
    );
    assert_eq!(format!("{err}"), "expected 3 sensor kinds, got 2");
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn non_positive_radius_is_rejected(#[case] r: f64) {
    let err = SensorArray::builder()
        .sensor(DVec2::ZERO, r)
        .try_build()
        .expect_err("bad radius");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[rstest]
fn follower_rejects_zero_scan_rate() {
    let ic = IntersectionCfg {
        scan_rate: 0.0,
        ..IntersectionCfg::default()
    };
    let err = ThreeSensorFollow::builder()
        .intersection(ic)
        .try_build()
        .expect_err("scan rate");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains("turn rates")),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}
