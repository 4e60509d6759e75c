//! Floating-point nanosecond durations.
//!
//! Averages and per-element times are rarely whole nanoseconds (9 µs spread over a
//! million elements is 0.009 ns each), so the count is kept as `f64`.

use crate::units::UnitPicker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

const SECONDS_PER_NANO: f64 = 1.0e-9;

/// Wire form of a duration: `{"durationDoubleNs": <f64>}`. A record without the
/// field is a zero duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationRecord {
    #[serde(rename = "durationDoubleNs", default)]
    pub duration_double_ns: f64,
}

/// Non-negative duration measured in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "DurationRecord", into = "DurationRecord")]
pub struct Duration {
    nanos: f64,
}

impl Duration {
    pub const ZERO: Duration = Duration { nanos: 0.0 };

    pub fn from_nanos(nanos: f64) -> Self {
        Self { nanos }
    }

    pub fn as_nanoseconds(&self) -> f64 {
        self.nanos
    }

    pub fn as_seconds(&self) -> f64 {
        self.nanos * SECONDS_PER_NANO
    }

    /// Splits the duration evenly over `divisor` parts; `divisor` must be positive.
    pub fn divide(&self, divisor: f64) -> Duration {
        Duration::from_nanos(self.nanos / divisor)
    }

    /// Renders with the unit `picker` chooses for the value in seconds,
    /// e.g. `12.34 ms`.
    pub fn display<'a>(&self, picker: &'a UnitPicker) -> ScaledDuration<'a> {
        ScaledDuration {
            duration: *self,
            picker,
        }
    }
}

impl TryFrom<DurationRecord> for Duration {
    type Error = String;

    fn try_from(record: DurationRecord) -> Result<Self, Self::Error> {
        let nanos = record.duration_double_ns;
        if !nanos.is_finite() || nanos < 0.0 {
            return Err(format!("invalid duration: {nanos} ns"));
        }
        Ok(Duration::from_nanos(nanos))
    }
}

impl From<Duration> for DurationRecord {
    fn from(d: Duration) -> Self {
        DurationRecord {
            duration_double_ns: d.nanos,
        }
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::from_nanos(self.nanos + rhs.nanos)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, Add::add)
    }
}

/// [`Duration`] bound to a unit picker for display.
pub struct ScaledDuration<'a> {
    duration: Duration,
    picker: &'a UnitPicker,
}

impl fmt::Display for ScaledDuration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.picker.select(self.duration.as_seconds()) {
            Some(unit) => {
                let scaled = self.duration.nanos * (SECONDS_PER_NANO / unit.multiplier);
                write!(f, "{scaled:.2} {}", unit.label)
            }
            None => write!(f, "{:.2} ns", self.duration.nanos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{UnitPicker, DURATION_UNITS};

    fn shown(ns: f64) -> String {
        let picker = UnitPicker::new(&DURATION_UNITS);
        Duration::from_nanos(ns).display(&picker).to_string()
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Duration::default(), Duration::ZERO);
        assert_eq!(Duration::default().as_seconds(), 0.0);
    }

    #[test]
    fn test_conversions() {
        let d = Duration::from_nanos(3.5);
        assert_eq!(d.as_nanoseconds(), 3.5);
        assert!((d.as_seconds() - 3.5e-9).abs() < 1e-20);
    }

    #[test]
    fn test_divide() {
        let d = Duration::from_nanos(3_000_000.0).divide(1000.0);
        assert_eq!(d.as_nanoseconds(), 3_000.0);

        let d = Duration::from_nanos(9_000.0).divide(1_000_000.0);
        assert!((d.as_nanoseconds() - 0.009).abs() < 1e-12);
    }

    #[test]
    fn test_display_units() {
        assert_eq!(shown(0.0), "0.00 ns");
        assert_eq!(shown(12.0), "12.00 ns");
        assert_eq!(shown(3_000.0), "3.00 mcs");
        assert_eq!(shown(3_000_000.0), "3.00 ms");
        assert_eq!(shown(12_345_678.0), "12.35 ms");
        assert_eq!(shown(2.5e9), "2.50 s");
        assert_eq!(shown(90.0e9), "1.50 min");
    }

    #[test]
    fn test_sum() {
        let total: Duration = [1.0, 2.5, 3.5]
            .into_iter()
            .map(Duration::from_nanos)
            .sum();
        assert_eq!(total.as_nanoseconds(), 7.0);
    }

    #[test]
    fn test_deserialize_record() {
        let d: Duration = serde_json::from_str(r#"{"durationDoubleNs": 1500.5}"#).unwrap();
        assert_eq!(d.as_nanoseconds(), 1500.5);

        let json = serde_json::to_value(d).unwrap();
        assert_eq!(json["durationDoubleNs"], 1500.5);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = serde_json::from_str::<Duration>(r#"{"durationDoubleNs": -1.0}"#).unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }

    #[test]
    fn test_missing_field_is_zero() {
        let d: Duration = serde_json::from_str(r#"{"durationNs": 1.0}"#).unwrap();
        assert_eq!(d, Duration::ZERO);

        let d: Duration = serde_json::from_str("{}").unwrap();
        assert_eq!(d.as_nanoseconds(), 0.0);
    }
}
