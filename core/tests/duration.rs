//! Duration formatting.

use refinery_core::duration::{format_duration, Hms};

/// Hours appear only when non-zero; minutes and seconds always do.
#[test]
fn minutes_always_shown_hours_only_when_nonzero() {
    assert_eq!(format_duration(0.0), "0m 0s");
    assert_eq!(format_duration(59.0), "0m 59s");
    assert_eq!(format_duration(60.0), "1m 0s");
    assert_eq!(format_duration(3_600.0), "1h 0m 0s");
    assert_eq!(format_duration(3_661.0), "1h 1m 1s");
    assert_eq!(format_duration(6_750.0), "1h 52m 30s");
}

/// Fractional seconds round to the nearest whole second.
#[test]
fn fractional_seconds_round() {
    assert_eq!(format_duration(59.4), "0m 59s");
    assert_eq!(format_duration(59.6), "1m 0s");
    assert_eq!(format_duration(2_500.0 / 3.0), "13m 53s");
}

/// Hours are not wrapped into days.
#[test]
fn long_durations_keep_counting_hours() {
    let hms = Hms::from_seconds(100.0 * 3_600.0 + 5.0);
    assert_eq!(hms, Hms { hours: 100, minutes: 0, seconds: 5 });
    assert_eq!(hms.total_seconds(), 360_005);
}
