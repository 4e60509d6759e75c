//! Indicators shown per fixture: step durations, per-element processing time and
//! throughput.

use crate::duration::Duration;
use crate::error::Result;
use crate::resolve::{calculate_total_duration, resolve_step};
use crate::schema::Fixture;
use crate::units::UnitCatalogs;

/// Step id of the trailing totals column in every per-step indicator group.
pub const TOTAL_DURATION_STEP_ID: &str = "totalDuration";
pub const TOTAL_DURATION_STEP_TITLE: &str = "Total duration";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorId {
    Duration,
    ElementProcessingTime,
    Throughput,
    Failure,
}

impl IndicatorId {
    /// Row field id of the indicator (or the prefix of its per-step field ids).
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorId::Duration => "DurationIndicator",
            IndicatorId::ElementProcessingTime => "ElementProcessingTimeIndicator",
            IndicatorId::Throughput => "ThroughputIndicator",
            IndicatorId::Failure => "FailureIndicator",
        }
    }

    /// `{indicator}-{step}` field id of one per-step cell.
    pub fn step_field(&self, step: &str) -> String {
        format!("{}-{}", self.as_str(), step)
    }

    pub fn total_field(&self) -> String {
        self.step_field(TOTAL_DURATION_STEP_ID)
    }
}

/// Display names of the indicators.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    entries: Vec<(IndicatorId, String)>,
}

impl IndicatorCatalog {
    pub fn new(entries: Vec<(IndicatorId, String)>) -> Self {
        Self { entries }
    }

    /// Display name of `id`, or its field id when the catalog has no entry.
    pub fn name(&self, id: IndicatorId) -> &str {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map_or(id.as_str(), |(_, name)| name.as_str())
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::new(vec![
            (IndicatorId::Duration, "Duration indicator".to_string()),
            (
                IndicatorId::ElementProcessingTime,
                "Element processing time indicator".to_string(),
            ),
            (IndicatorId::Throughput, "Throughput".to_string()),
            (IndicatorId::Failure, "Failure reason".to_string()),
        ])
    }
}

/// A computed cell value together with the way it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// `12.34 ms`
    Duration(Duration),
    /// Events per second, `1.23M`
    Rate(f64),
    Text(String),
}

impl CellValue {
    pub fn format(&self, units: &UnitCatalogs) -> String {
        match self {
            CellValue::Duration(d) => d.display(&units.duration).to_string(),
            CellValue::Rate(rate) => match units.rate.select(*rate) {
                Some(unit) => format!("{:.2}{}", unit.scale(*rate), unit.label),
                None => format!("{rate:.2}"),
            },
            CellValue::Text(text) => text.clone(),
        }
    }
}

/// Time spent per element in one step.
pub fn step_element_processing_time(
    fixture: &Fixture,
    element_count: u64,
    step: &str,
) -> Result<Duration> {
    Ok(resolve_step(fixture, step)?.divide(element_count as f64))
}

/// Time spent per element over all steps.
pub fn total_element_processing_time(fixture: &Fixture, element_count: u64) -> Result<Duration> {
    Ok(calculate_total_duration(fixture)?.divide(element_count as f64))
}

/// Elements processed per second over the total duration.
pub fn throughput(fixture: &Fixture, element_count: u64) -> Result<f64> {
    Ok(element_count as f64 / calculate_total_duration(fixture)?.as_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompressedStep, FixtureOutcome, TimingEncoding};
    use std::collections::BTreeMap;

    fn fixture() -> Fixture {
        let steps = BTreeMap::from([
            (
                "load".to_string(),
                CompressedStep::average(Duration::from_nanos(2_500_000.0)),
            ),
            (
                "compute".to_string(),
                CompressedStep::average(Duration::from_nanos(500_000.0)),
            ),
        ]);
        Fixture {
            name: "gpu".to_string(),
            iteration_count: Some(10),
            outcome: FixtureOutcome::Timed(TimingEncoding::Compressed(steps)),
        }
    }

    #[test]
    fn test_field_ids() {
        assert_eq!(IndicatorId::Duration.step_field("load"), "DurationIndicator-load");
        assert_eq!(
            IndicatorId::ElementProcessingTime.total_field(),
            "ElementProcessingTimeIndicator-totalDuration"
        );
    }

    #[test]
    fn test_catalog_names_and_fallback() {
        let catalog = IndicatorCatalog::default();
        assert_eq!(catalog.name(IndicatorId::Duration), "Duration indicator");
        assert_eq!(catalog.name(IndicatorId::Throughput), "Throughput");

        let sparse = IndicatorCatalog::new(vec![]);
        assert_eq!(sparse.name(IndicatorId::Throughput), "ThroughputIndicator");
    }

    #[test]
    fn test_per_element_times() {
        let f = fixture();
        let load = step_element_processing_time(&f, 1000, "load").unwrap();
        assert_eq!(load.as_nanoseconds(), 2_500.0);

        let total = total_element_processing_time(&f, 1000).unwrap();
        assert_eq!(total.as_nanoseconds(), 3_000.0);
    }

    #[test]
    fn test_throughput() {
        let rate = throughput(&fixture(), 1000).unwrap();
        assert!((rate - 1000.0 / 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_cell_formats() {
        let units = UnitCatalogs::default();
        let f = fixture();

        let total = calculate_total_duration(&f).unwrap();
        assert_eq!(CellValue::Duration(total).format(&units), "3.00 ms");

        let per_element = total_element_processing_time(&f, 1000).unwrap();
        assert_eq!(CellValue::Duration(per_element).format(&units), "3.00 mcs");

        let rate = throughput(&f, 1000).unwrap();
        assert_eq!(CellValue::Rate(rate).format(&units), "333.33K");

        assert_eq!(CellValue::Rate(12.0).format(&units), "12.00");
        assert_eq!(CellValue::Rate(1.5e6).format(&units), "1.50M");
        assert_eq!(CellValue::Text("OOM".to_string()).format(&units), "OOM");
    }
}
