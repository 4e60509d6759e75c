//! Reduces a fixture's step timings to one authoritative [`Duration`] per step.

use crate::duration::Duration;
use crate::error::{ReportError, Result};
use crate::schema::{Fixture, TimingEncoding};

/// Duration of `step` in `fixture`, whichever encoding the fixture uses.
///
/// Compressed steps resolve to their average. Raw steps must carry exactly one
/// sample; averaging several is not supported. Nothing is cached, every call
/// resolves from the report data again.
pub fn resolve_step(fixture: &Fixture, step: &str) -> Result<Duration> {
    let timing = fixture.timing().ok_or_else(|| ReportError::NoTiming {
        fixture: fixture.name.clone(),
    })?;

    let missing = || ReportError::MissingStep {
        fixture: fixture.name.clone(),
        step: step.to_string(),
    };

    match timing {
        TimingEncoding::Compressed(steps) => steps.get(step).map(|s| s.avg).ok_or_else(missing),
        TimingEncoding::Full(steps) => match steps.get(step).ok_or_else(missing)?.as_slice() {
            [single] => Ok(*single),
            samples => Err(ReportError::UnsupportedAggregation {
                fixture: fixture.name.clone(),
                step: step.to_string(),
                samples: samples.len(),
            }),
        },
    }
}

/// Sum of the resolved durations of every step the fixture has timing for.
pub fn calculate_total_duration(fixture: &Fixture) -> Result<Duration> {
    let timing = fixture.timing().ok_or_else(|| ReportError::NoTiming {
        fixture: fixture.name.clone(),
    })?;

    timing
        .step_ids()
        .into_iter()
        .map(|step| resolve_step(fixture, step))
        .sum()
}
