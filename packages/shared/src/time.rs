use chrono::{Local, TimeZone, Utc};

/// Get current Unix timestamp (milliseconds, UTC)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as local `HH:MM:SS` for display.
pub fn format_clock_time(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_time_shape() {
        // テスト項目: 表示用の時刻は HH:MM:SS 形式になる
        // when (操作):
        let formatted = format_clock_time(now_millis());

        // then (期待する結果):
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.chars().filter(|c| *c == ':').count(), 2);
    }

    #[test]
    fn test_now_millis_is_monotonic_enough() {
        // テスト項目: 連続して取得したタイムスタンプは減少しない
        let first = now_millis();
        let second = now_millis();
        assert!(second >= first);
    }
}
