//! Turns a parsed report into the view model handed to a display: one table per
//! fixture family, one row per fixture.
//!
//! Building the view is a pure function of the report and the [`ViewConfig`];
//! displaying it is left to [`crate::display`].

use crate::columns::{
    build_columns, Column, FIXTURE_ID_FIELD, ITERATION_COUNT_FIELD, PLATFORM_FIELD,
};
use crate::error::Result;
use crate::indicators::{
    step_element_processing_time, throughput, total_element_processing_time, CellValue,
    IndicatorCatalog, IndicatorId,
};
use crate::resolve::{calculate_total_duration, resolve_step};
use crate::schema::{BenchmarkReport, DeviceList, Fixture, FixtureFamily, FixtureOutcome, Timestamp};
use crate::units::UnitCatalogs;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Display configuration shared by every table of a view.
#[derive(Debug, Clone, Default)]
pub struct ViewConfig {
    pub units: UnitCatalogs,
    pub indicators: IndicatorCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: usize,
    pub fixture_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_count: Option<u64>,
    /// Formatted indicator cells keyed by field id. Cells that do not apply to the
    /// row are absent.
    #[serde(flatten)]
    pub cells: BTreeMap<String, String>,
}

impl Row {
    /// Text of the cell bound to `field`, if the row has one.
    pub fn value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            FIXTURE_ID_FIELD => Some(self.fixture_id.clone()),
            PLATFORM_FIELD => self.platform.clone(),
            ITERATION_COUNT_FIELD => self.iteration_count.map(|n| n.to_string()),
            _ => self.cells.get(field).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTable {
    pub name: String,
    /// Field the rows are grouped by.
    pub group_by: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub generated_at: Timestamp,
    pub tables: Vec<FamilyTable>,
}

impl ViewModel {
    pub fn caption(&self) -> String {
        format!("Benchmark data were generated at {}", self.generated_at)
    }
}

/// Builds the whole view, or fails without producing any table.
pub fn render(report: &BenchmarkReport, config: &ViewConfig) -> Result<ViewModel> {
    info!(
        families = report.fixture_families.len(),
        "building benchmark view"
    );

    let tables = report
        .fixture_families
        .iter()
        .map(|family| render_family(family, &report.device_list, config))
        .collect::<Result<Vec<_>>>()?;

    info!(tables = tables.len(), "benchmark view ready");
    Ok(ViewModel {
        generated_at: report.base_info.time.clone(),
        tables,
    })
}

pub fn render_family(
    family: &FixtureFamily,
    devices: &DeviceList,
    config: &ViewConfig,
) -> Result<FamilyTable> {
    debug!(
        family = %family.name,
        fixtures = family.fixtures.len(),
        element_count = ?family.element_count,
        "rendering fixture family"
    );

    let rows = family
        .fixtures
        .iter()
        .enumerate()
        .map(|(id, fixture)| build_row(id, fixture, family.element_count, devices, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(FamilyTable {
        name: family.name.clone(),
        group_by: PLATFORM_FIELD,
        columns: build_columns(
            &family.steps,
            family.element_count.is_some(),
            &config.indicators,
        ),
        rows,
    })
}

fn build_row(
    id: usize,
    fixture: &Fixture,
    element_count: Option<u64>,
    devices: &DeviceList,
    config: &ViewConfig,
) -> Result<Row> {
    let device = fixture.device_name();
    let platform = devices.platform_of(device).map(str::to_string);
    if platform.is_none() {
        warn!(fixture = %fixture.name, device, "device is not listed under any platform");
    }

    let cells = match &fixture.outcome {
        FixtureOutcome::Failed(reason) => {
            BTreeMap::from([(IndicatorId::Failure.as_str().to_string(), reason.clone())])
        }
        FixtureOutcome::Timed(_) => fixture_cells(fixture, element_count, &config.units)?,
    };

    Ok(Row {
        id,
        fixture_id: fixture.name.clone(),
        platform,
        iteration_count: fixture.iteration_count,
        cells,
    })
}

/// Formatted duration, per-element and throughput cells of a timed fixture.
pub fn fixture_cells(
    fixture: &Fixture,
    element_count: Option<u64>,
    units: &UnitCatalogs,
) -> Result<BTreeMap<String, String>> {
    let steps = fixture
        .timing()
        .map(|timing| timing.step_ids())
        .unwrap_or_default();

    let mut cells = BTreeMap::new();
    let mut put = |field: String, value: CellValue| {
        cells.insert(field, value.format(units));
    };

    for step in &steps {
        let duration = resolve_step(fixture, step)?;
        put(IndicatorId::Duration.step_field(step), CellValue::Duration(duration));
    }
    put(
        IndicatorId::Duration.total_field(),
        CellValue::Duration(calculate_total_duration(fixture)?),
    );

    if let Some(count) = element_count {
        let indicator = IndicatorId::ElementProcessingTime;
        for step in &steps {
            let per_element = step_element_processing_time(fixture, count, step)?;
            put(indicator.step_field(step), CellValue::Duration(per_element));
        }
        put(
            indicator.total_field(),
            CellValue::Duration(total_element_processing_time(fixture, count)?),
        );
        put(
            IndicatorId::Throughput.as_str().to_string(),
            CellValue::Rate(throughput(fixture, count)?),
        );
    }

    Ok(cells)
}
