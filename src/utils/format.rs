//! Remaining-time formatting

use std::time::Duration;

/// Render a remaining duration as a compact "time left" projection.
///
/// Units are floored, zero units are dropped, and seconds are shown only
/// when non-zero or when nothing else would be printed.
pub fn format_time_left(remaining: Duration) -> String {
    let (hours, minutes, seconds) = split_hms(remaining);

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }

    format!("{} left", parts.join(" "))
}

/// Render an elapsed duration, keeping every unit below the largest non-zero one
pub fn format_elapsed(elapsed: Duration) -> String {
    match split_hms(elapsed) {
        (0, 0, seconds) => format!("{}s", seconds),
        (0, minutes, seconds) => format!("{}m {}s", minutes, seconds),
        (hours, minutes, seconds) => format!("{}h {}m {}s", hours, minutes, seconds),
    }
}

/// Whole hours, minutes and seconds, each floored
fn split_hms(duration: Duration) -> (u64, u64, u64) {
    let total_seconds = duration.as_secs();
    (total_seconds / 3600, (total_seconds % 3600) / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_zero_seconds_when_larger_units_present() {
        assert_eq!(format_time_left(Duration::from_millis(90 * 60 * 1000)), "1h 30m left");
    }

    #[test]
    fn shows_seconds_only_under_a_minute() {
        assert_eq!(format_time_left(Duration::from_millis(45 * 1000)), "45s left");
    }

    #[test]
    fn zero_is_zero_seconds() {
        assert_eq!(format_time_left(Duration::ZERO), "0s left");
        assert_eq!(format_time_left(Duration::from_millis(999)), "0s left");
    }

    #[test]
    fn floors_each_unit() {
        assert_eq!(format_time_left(Duration::from_millis(61_999)), "1m 1s left");
        assert_eq!(format_time_left(Duration::from_secs(2 * 3600 + 5)), "2h 5s left");
        assert_eq!(format_time_left(Duration::from_secs(3600)), "1h left");
        assert_eq!(format_time_left(Duration::from_secs(119 * 60 + 59)), "1h 59m 59s left");
    }

    #[test]
    fn elapsed_keeps_lower_units() {
        assert_eq!(format_elapsed(Duration::from_secs(7)), "7s");
        assert_eq!(format_elapsed(Duration::from_secs(120)), "2m 0s");
        assert_eq!(format_elapsed(Duration::from_secs(3600 + 5)), "1h 0m 5s");
    }
}
