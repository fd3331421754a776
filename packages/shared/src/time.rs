use chrono::{DateTime, Local, Utc};

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as a local `HH:MM:SS` clock
pub fn format_clock(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Format a Unix timestamp (milliseconds) as RFC 3339 in UTC
pub fn format_rfc3339(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.to_rfc3339(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() {
        // テスト項目: UTC の RFC 3339 文字列に変換できる
        // then (期待する結果):
        assert_eq!(format_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_format_clock_shape() {
        // テスト項目: 時計表示は HH:MM:SS の 8 文字になる
        // when (操作):
        let clock = format_clock(now_millis());

        // then (期待する結果):
        assert_eq!(clock.len(), 8);
        assert_eq!(clock.matches(':').count(), 2);
    }
}
