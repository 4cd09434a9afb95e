//! Wall-clock formatting for record timestamps.

use chrono::{DateTime, Local, Utc};
use contracts::ClockZone;

const TIME_OF_DAY: &str = "%H:%M:%S";

/// Format epoch milliseconds as `HH:mm:ss` (24h)
///
/// Out-of-range timestamps format as `00:00:00`.
pub fn time_of_day(timestamp_ms: i64, zone: ClockZone) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
        return "00:00:00".to_string();
    };
    match zone {
        ClockZone::Utc => utc.format(TIME_OF_DAY).to_string(),
        ClockZone::Local => utc.with_timezone(&Local).format(TIME_OF_DAY).to_string(),
    }
}

/// Current time, epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_formatting() {
        // 2023-11-14T22:13:20.500Z
        assert_eq!(time_of_day(1_700_000_000_500, ClockZone::Utc), "22:13:20");
        assert_eq!(time_of_day(0, ClockZone::Utc), "00:00:00");
    }

    #[test]
    fn test_local_formatting_shape() {
        let formatted = time_of_day(now_ms(), ClockZone::Local);
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.as_bytes()[2], b':');
        assert_eq!(formatted.as_bytes()[5], b':');
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(time_of_day(i64::MAX, ClockZone::Utc), "00:00:00");
    }
}
