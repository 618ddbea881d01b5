use crate::sim::{Clock, RealTimeClock, SimError, SimTime, VirtualClock};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn virtual_clock_is_shared_and_monotonic() {
    let clock = VirtualClock::shared(SimTime(1.0));
    let reader: Arc<dyn Clock> = clock.clone();
    assert_eq!(reader.now(), SimTime(1.0));

    clock.advance_to(SimTime(4.0)).expect("advance");
    assert_eq!(reader.now(), SimTime(4.0));

    clock.advance_to(SimTime(4.0)).expect("same instant is allowed");
    let err = clock.advance_to(SimTime(3.0)).expect_err("regression");
    assert!(matches!(err, SimError::ClockRegression { .. }));
    assert_eq!(reader.now(), SimTime(4.0));

    let err = clock.advance_to(SimTime(f64::NAN)).expect_err("nan");
    assert!(matches!(err, SimError::InvalidTime { .. }));
}

#[test]
fn virtual_clock_wait_is_a_no_op() {
    let clock = VirtualClock::default();
    clock.wait_until(SimTime(1e9)).expect("virtual wait");
    assert_eq!(clock.now(), SimTime::ZERO);
}

#[test]
fn real_time_clock_reads_inner_clock() {
    let inner = VirtualClock::shared(SimTime::ZERO);
    let rt = RealTimeClock::new(inner.clone(), 1.0, Duration::from_millis(100)).expect("real-time clock");
    inner.advance_to(SimTime(3.0)).expect("advance");
    assert_eq!(rt.now(), SimTime(3.0));
    assert_eq!(rt.time_scale(), 1.0);
}

#[test]
fn real_time_clock_sleeps_until_scaled_target() {
    let inner = VirtualClock::shared(SimTime::ZERO);
    let rt = RealTimeClock::new(inner, 0.5, Duration::from_secs(1)).expect("real-time clock");
    let start = Instant::now();
    rt.wait_until(SimTime(0.04)).expect("wait");
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn real_time_clock_reports_lag_beyond_jitter() {
    let inner = VirtualClock::shared(SimTime::ZERO);
    let rt = RealTimeClock::new(inner, 0.0, Duration::from_millis(1)).expect("real-time clock");
    std::thread::sleep(Duration::from_millis(10));
    let err = rt.wait_until(SimTime(5.0)).expect_err("lagging");
    assert!(matches!(err, SimError::RealTimeLag { .. }));
}

#[test]
fn real_time_clock_rejects_infinite_target() {
    let inner = VirtualClock::shared(SimTime::ZERO);
    let rt = RealTimeClock::new(inner, 1.0, Duration::from_millis(10)).expect("real-time clock");
    let err = rt.wait_until(SimTime::INFINITY).expect_err("infinite");
    assert!(matches!(err, SimError::InvalidTime { .. }));
}

#[test]
fn real_time_clock_rejects_non_finite_or_negative_scale() {
    for scale in [f64::INFINITY, f64::NAN, -1.0] {
        let inner = VirtualClock::shared(SimTime::ZERO);
        let err = RealTimeClock::new(inner, scale, Duration::from_millis(10))
            .expect_err("invalid scale");
        assert!(matches!(err, SimError::InvalidTimeScale { .. }));
    }
}

#[test]
fn real_time_clock_reports_unrepresentable_wall_target() {
    let inner = VirtualClock::shared(SimTime::ZERO);
    let rt = RealTimeClock::new(inner, 1e300, Duration::from_millis(10)).expect("finite scale");
    let err = rt.wait_until(SimTime(1.0)).expect_err("overflowing target");
    assert!(matches!(err, SimError::InvalidTime { t } if t == SimTime(1.0)));
}
