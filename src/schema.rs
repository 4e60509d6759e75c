//! Benchmark report layout as written by the benchmark runner.
//!
//! Fixtures are resolved into an explicit [`FixtureOutcome`] while deserializing, so
//! later stages never have to probe which of `failureReason`, `compressedDuration` or
//! `fullDuration` is present.

use crate::duration::Duration;
use chrono::{DateTime, SecondsFormat};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub base_info: BaseInfo,
    pub device_list: DeviceList,
    pub fixture_families: Vec<FixtureFamily>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseInfo {
    pub time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
}

/// Report generation time, either preformatted text or milliseconds since the Unix
/// epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    Numeric(f64),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Text(s) => f.write_str(s),
            Timestamp::Numeric(millis) => {
                let date = Some(*millis)
                    .filter(|ms| ms.is_finite())
                    .and_then(|ms| DateTime::from_timestamp_millis(ms as i64));
                match date {
                    Some(date) => f.write_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    None => write!(f, "{millis}"),
                }
            }
        }
    }
}

/// Platforms and their devices, in report order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    platforms: Vec<(String, Vec<String>)>,
}

impl DeviceList {
    pub fn new(platforms: Vec<(String, Vec<String>)>) -> Self {
        Self { platforms }
    }

    pub fn platforms(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.platforms
            .iter()
            .map(|(name, devices)| (name.as_str(), devices.as_slice()))
    }

    /// First platform (in report order) listing `device`.
    pub fn platform_of(&self, device: &str) -> Option<&str> {
        self.platforms
            .iter()
            .find(|(_, devices)| devices.iter().any(|d| d == device))
            .map(|(name, _)| name.as_str())
    }
}

impl Serialize for DeviceList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.platforms.len()))?;
        for (name, devices) in &self.platforms {
            map.serialize_entry(name, devices)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DeviceList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeviceListVisitor;

        impl<'de> Visitor<'de> for DeviceListVisitor {
            type Value = DeviceList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from platform name to an array of device names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DeviceList, A::Error> {
                let mut platforms = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, devices)) = access.next_entry::<String, Vec<String>>()? {
                    platforms.push((name, devices));
                }
                Ok(DeviceList { platforms })
            }
        }

        deserializer.deserialize_map(DeviceListVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureFamily {
    pub name: String,
    pub steps: Vec<String>,
    /// Known positive element count; enables per-element and throughput indicators.
    #[serde(
        default,
        deserialize_with = "deserialize_element_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub element_count: Option<u64>,
    pub fixtures: Vec<Fixture>,
}

// Anything but a positive whole number disables the element-based indicators.
fn deserialize_element_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let count = match &value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(v) => v
            .as_u64()
            .or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .filter(|n| *n > 0),
    };
    if count.is_none() {
        tracing::warn!(value = ?value, "ignoring elementCount that is not a positive integer");
    }
    Ok(count)
}

/// Pre-aggregated statistics of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressedStep {
    pub avg: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Duration>,
}

impl CompressedStep {
    pub fn average(avg: Duration) -> Self {
        Self {
            avg,
            min: None,
            max: None,
        }
    }
}

/// The two ways a fixture's step timings are encoded, keyed by step id.
#[derive(Debug, Clone, PartialEq)]
pub enum TimingEncoding {
    Compressed(BTreeMap<String, CompressedStep>),
    Full(BTreeMap<String, Vec<Duration>>),
}

impl TimingEncoding {
    /// Step ids present in the encoding, in a stable order.
    pub fn step_ids(&self) -> Vec<&str> {
        match self {
            TimingEncoding::Compressed(steps) => steps.keys().map(String::as_str).collect(),
            TimingEncoding::Full(steps) => steps.keys().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureOutcome {
    Failed(String),
    Timed(TimingEncoding),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFixture", into = "RawFixture")]
pub struct Fixture {
    pub name: String,
    pub iteration_count: Option<u64>,
    pub outcome: FixtureOutcome,
}

impl Fixture {
    /// Device the fixture ran on.
    ///
    /// Fixture ids are `device[, algorithm]`; the algorithm part is not split off yet,
    /// so the whole id is used as the device name.
    pub fn device_name(&self) -> &str {
        &self.name
    }

    pub fn timing(&self) -> Option<&TimingEncoding> {
        match &self.outcome {
            FixtureOutcome::Timed(timing) => Some(timing),
            FixtureOutcome::Failed(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            FixtureOutcome::Failed(reason) => Some(reason),
            FixtureOutcome::Timed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFixture {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iteration_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compressed_duration: Option<BTreeMap<String, CompressedStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_duration: Option<BTreeMap<String, Vec<Duration>>>,
}

impl TryFrom<RawFixture> for Fixture {
    type Error = String;

    fn try_from(raw: RawFixture) -> Result<Self, Self::Error> {
        let outcome = match (raw.failure_reason, raw.compressed_duration, raw.full_duration) {
            (Some(reason), None, None) => FixtureOutcome::Failed(reason),
            (None, Some(steps), None) => FixtureOutcome::Timed(TimingEncoding::Compressed(steps)),
            (None, None, Some(steps)) => FixtureOutcome::Timed(TimingEncoding::Full(steps)),
            (None, None, None) => {
                return Err(format!(
                    "fixture '{}' has neither failureReason nor timing data",
                    raw.name
                ))
            }
            _ => {
                return Err(format!(
                    "fixture '{}' must carry exactly one of failureReason, compressedDuration, fullDuration",
                    raw.name
                ))
            }
        };
        Ok(Fixture {
            name: raw.name,
            iteration_count: raw.iteration_count,
            outcome,
        })
    }
}

impl From<Fixture> for RawFixture {
    fn from(fixture: Fixture) -> Self {
        let mut raw = RawFixture {
            name: fixture.name,
            iteration_count: fixture.iteration_count,
            failure_reason: None,
            compressed_duration: None,
            full_duration: None,
        };
        match fixture.outcome {
            FixtureOutcome::Failed(reason) => raw.failure_reason = Some(reason),
            FixtureOutcome::Timed(TimingEncoding::Compressed(steps)) => {
                raw.compressed_duration = Some(steps)
            }
            FixtureOutcome::Timed(TimingEncoding::Full(steps)) => raw.full_duration = Some(steps),
        }
        raw
    }
}
