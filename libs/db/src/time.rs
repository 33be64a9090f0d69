//! Timestamp codec for TEXT columns.
//!
//! The Any driver has no native chrono support, so timestamps are stored as
//! RFC 3339 text. The format is fixed-width (microseconds, Z offset) so that
//! lexicographic ordering in SQL equals chronological ordering.

use chrono::{DateTime, SecondsFormat, Utc};

/// Encode a timestamp for storage.
pub fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp.
pub fn decode_ts(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn roundtrip() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        assert_eq!(decode_ts(&encode_ts(ts)).unwrap(), ts);
    }

    #[test]
    fn encoding_is_fixed_width_and_order_preserving() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(1);
        let (ea, eb) = (encode_ts(a), encode_ts(b));
        assert_eq!(ea.len(), eb.len());
        assert!(ea < eb);
    }
}
