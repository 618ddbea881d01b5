use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_secs(1.5), SimTime(1.5));
    assert_eq!(SimTime::from_millis(250.0), SimTime(0.25));
    assert_eq!(SimTime::from_micros(500.0), SimTime(0.0005));
    assert_eq!(SimTime(3.0).as_secs(), 3.0);
}

#[test]
fn infinity_absorbs_finite_advances() {
    assert_eq!(SimTime(10.0) + SimTime::INFINITY, SimTime::INFINITY);
    assert!((SimTime::INFINITY + SimTime(1.0)).is_infinite());
    assert!(SimTime(1e300) < SimTime::INFINITY);
}

#[test]
fn advance_validity() {
    assert!(SimTime::ZERO.is_valid_advance());
    assert!(SimTime::INFINITY.is_valid_advance());
    assert!(!SimTime(-0.1).is_valid_advance());
    assert!(!SimTime(f64::NAN).is_valid_advance());
    assert!(SimTime(-1.0).is_valid_instant());
    assert!(!SimTime(f64::NAN).is_valid_instant());
}

#[test]
fn display_formats_infinity() {
    assert_eq!(SimTime::INFINITY.to_string(), "inf");
    assert_eq!(SimTime(2.5).to_string(), "2.5s");
}
