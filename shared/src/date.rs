//! 日期展示模块
//!
//! 服务端以 `LocalDateTime`（无时区）下发预约时间，这里只负责格式化。

use chrono::NaiveDateTime;

/// 预约日期的占位文本
pub const DATE_TBD: &str = "TBD";

/// 格式化为 `Oct 18, 2026`
pub fn format_date(date: Option<&NaiveDateTime>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => DATE_TBD.to_string(),
    }
}

/// 格式化为 `Oct 18, 2026 · 14:30`
pub fn format_date_time(date: Option<&NaiveDateTime>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y · %H:%M").to_string(),
        None => DATE_TBD.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_backend_local_date_time() {
        let parsed: NaiveDateTime = "2026-10-08T14:30:00.123456".parse().unwrap();
        assert_eq!(format_date(Some(&parsed)), "Oct 8, 2026");
        assert_eq!(format_date_time(Some(&parsed)), "Oct 8, 2026 · 14:30");
        assert_eq!(format_date(None), "TBD");
    }
}
