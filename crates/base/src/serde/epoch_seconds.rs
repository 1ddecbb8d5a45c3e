//! Serializes [`OffsetDateTime`] as fractional Unix epoch seconds.

use serde::{Deserialize, Deserializer, Serializer};
use time::OffsetDateTime;

#[must_use]
pub fn to_f64(timestamp: OffsetDateTime) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let nanos = timestamp.unix_timestamp_nanos() as f64;
    nanos / 1_000_000_000.0
}

/// Converts epoch seconds back into a timestamp, clamping values outside the
/// representable range to the Unix epoch.
#[must_use]
pub fn from_f64(seconds: f64) -> OffsetDateTime {
    if !seconds.is_finite() {
        return OffsetDateTime::UNIX_EPOCH;
    }
    #[allow(clippy::cast_possible_truncation)]
    let nanos = (seconds * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// # Errors
pub fn serialize<S>(timestamp: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(to_f64(*timestamp))
}

/// # Errors
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    Ok(from_f64(seconds))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{from_f64, to_f64};

    #[test]
    fn test_conversion() {
        let timestamp = datetime!(2024-03-01 12:00:00.25 UTC);
        let seconds = to_f64(timestamp);
        assert!((seconds - 1_709_294_400.25).abs() < 1e-6);
        assert!((from_f64(seconds) - timestamp).abs() < time::Duration::milliseconds(1));
    }

    #[test]
    fn test_invalid_values_fall_back_to_epoch() {
        assert_eq!(from_f64(f64::NAN), time::OffsetDateTime::UNIX_EPOCH);
        assert_eq!(from_f64(f64::INFINITY), time::OffsetDateTime::UNIX_EPOCH);
        assert_eq!(from_f64(1e30), time::OffsetDateTime::UNIX_EPOCH);
    }
}
