//! Deterministic synthetic benchmark reports.
//!
//! Used to exercise the viewer without a benchmark run. Every fixture derives its
//! own RNG from the master seed and its position, so the output does not depend on
//! how families are scheduled across threads.

use crate::duration::Duration;
use crate::schema::{
    BaseInfo, BenchmarkReport, CompressedStep, DeviceList, Fixture, FixtureFamily,
    FixtureOutcome, TimingEncoding, Timestamp,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;

pub const FORMAT_VERSION: &str = "0.1.0";

const ELEMENT_COUNTS: [u64; 4] = [100, 1_000, 100_000, 1_000_000];
const FACTORIAL_STEPS: [&str; 3] = ["Write buffer", "Execution", "Read buffer"];
const CUBOID_STEPS: [&str; 4] = [
    "Map input data",
    "Unmap input data",
    "Calculating",
    "Map output volume data",
];

/// Configuration for sample generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub families: usize,
    pub seed: u64,
    /// Emit single-sample `fullDuration` timings instead of compressed averages.
    pub raw: bool,
    /// Value written to `baseInfo.time`.
    pub time: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            families: 4,
            seed: 42,
            raw: false,
            time: "1970-01-01T00:00:00Z".to_string(),
        }
    }
}

fn sample_devices() -> DeviceList {
    DeviceList::new(vec![
        (
            "NVIDIA CUDA".to_string(),
            vec!["GeForce GTX 1050 Ti".to_string()],
        ),
        (
            "Intel(R) OpenCL".to_string(),
            vec![
                "Intel(R) HD Graphics 630".to_string(),
                "Intel(R) Core(TM) i5-7300HQ CPU @ 2.50GHz".to_string(),
            ],
        ),
    ])
}

fn fixture_seed(master_seed: u64, family: usize, fixture: usize) -> u64 {
    master_seed
        .wrapping_add(((family as u64) << 32) | fixture as u64)
        .wrapping_mul(0x517cc1b727220a95)
}

fn generate_fixture(rng: &mut ChaCha8Rng, name: &str, steps: &[&str], raw: bool) -> Fixture {
    if rng.gen_ratio(1, 8) {
        return Fixture {
            name: name.to_string(),
            iteration_count: None,
            outcome: FixtureOutcome::Failed("OpenCL program build failure".to_string()),
        };
    }

    let averages = steps
        .iter()
        .map(|step| (step.to_string(), rng.gen_range(1_000.0..5_000_000.0)));

    let (iteration_count, timing) = if raw {
        let steps = averages
            .map(|(step, ns)| (step, vec![Duration::from_nanos(ns)]))
            .collect::<BTreeMap<_, _>>();
        (1, TimingEncoding::Full(steps))
    } else {
        let steps = averages
            .map(|(step, ns)| {
                let record = CompressedStep {
                    avg: Duration::from_nanos(ns),
                    min: Some(Duration::from_nanos(ns * 0.9)),
                    max: Some(Duration::from_nanos(ns * 1.1)),
                };
                (step, record)
            })
            .collect::<BTreeMap<_, _>>();
        (10, TimingEncoding::Compressed(steps))
    };

    Fixture {
        name: name.to_string(),
        iteration_count: Some(iteration_count),
        outcome: FixtureOutcome::Timed(timing),
    }
}

fn generate_family(config: &SampleConfig, devices: &[String], index: usize) -> FixtureFamily {
    let (name, steps, element_count): (String, &[&str], Option<u64>) = if index % 2 == 0 {
        let count = ELEMENT_COUNTS[(index / 2) % ELEMENT_COUNTS.len()];
        (format!("Factorial, {count} elements"), &FACTORIAL_STEPS[..], Some(count))
    } else {
        (format!("Cuboid volumes, run {}", index / 2 + 1), &CUBOID_STEPS[..], None)
    };

    let fixtures = devices
        .iter()
        .enumerate()
        .map(|(i, device)| {
            let mut rng = ChaCha8Rng::seed_from_u64(fixture_seed(config.seed, index, i));
            generate_fixture(&mut rng, device, steps, config.raw)
        })
        .collect();

    FixtureFamily {
        name,
        steps: steps.iter().map(|s| s.to_string()).collect(),
        element_count,
        fixtures,
    }
}

/// Generates a report with `config.families` fixture families, one fixture per
/// sample device in each.
pub fn generate_report(config: &SampleConfig) -> BenchmarkReport {
    let device_list = sample_devices();
    let devices: Vec<String> = device_list
        .platforms()
        .flat_map(|(_, devices)| devices.iter().cloned())
        .collect();

    // Range is an IndexedParallelIterator; collect preserves order.
    let fixture_families = (0..config.families)
        .into_par_iter()
        .map(|index| generate_family(config, &devices, index))
        .collect();

    BenchmarkReport {
        base_info: BaseInfo {
            time: Timestamp::Text(config.time.clone()),
            about: Some("Synthetic benchmark report.".to_string()),
            format_version: Some(FORMAT_VERSION.to_string()),
        },
        device_list,
        fixture_families,
    }
}
