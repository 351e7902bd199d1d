//! `created_at` 时间解析
//!
//! 只接受以下几种写法，其余一律视为解析失败，不做"尽量修补"：
//! - `2024-01-15T10:30:00Z`
//! - `2024-01-15T10:30:00+01:00` / `2024-01-15T10:30:00-05:00`
//! - `2024-01-15T10:30:00+0100`
//! - `2024-01-15T10:30:00`（无时区，按 UTC 处理）
//!
//! 秒后面可以带小数部分。

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("无法解析时间: '{input}'")]
pub struct TimestampParseError {
    pub input: String,
}

/// 带时区偏移的格式，`%z` 同时接受 `+HH:MM` 和 `+HHMM`
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// 解析为 UTC 时间
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    let input = raw.trim();
    let err = || TimestampParseError {
        input: raw.to_string(),
    };
    if input.is_empty() {
        return Err(err());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(input, OFFSET_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, NAIVE_FORMAT) {
        return Ok(naive.and_utc());
    }

    Err(err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_trailing_z() {
        assert_eq!(parse_created_at("2024-01-15T10:30:00Z").unwrap(), utc(2024, 1, 15, 10, 30));
    }

    #[test]
    fn test_colon_and_compact_offsets_agree() {
        let expected = utc(2024, 1, 15, 9, 30);
        assert_eq!(parse_created_at("2024-01-15T10:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_created_at("2024-01-15T10:30:00+0100").unwrap(), expected);
    }

    #[test]
    fn test_negative_offset() {
        assert_eq!(parse_created_at("2024-01-15T10:30:00-05:00").unwrap(), utc(2024, 1, 15, 15, 30));
    }

    #[test]
    fn test_fractional_seconds_and_naive() {
        assert_eq!(
            parse_created_at("2024-01-15T10:30:00.123456+00:00").unwrap().timestamp(),
            utc(2024, 1, 15, 10, 30).timestamp()
        );
        assert_eq!(parse_created_at("2024-01-15T10:30:00").unwrap(), utc(2024, 1, 15, 10, 30));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for raw in ["", "   ", "not-a-date-string", "2024-13-45T99:99:99Z", "15/01/2024"] {
            assert!(parse_created_at(raw).is_err(), "should reject {raw:?}");
        }
    }
}
