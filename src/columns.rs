//! Column tree of a fixture family table.
//!
//! The shape depends on the data: per-element and throughput columns only exist
//! when the family knows its element count.

use crate::indicators::{IndicatorCatalog, IndicatorId, TOTAL_DURATION_STEP_TITLE};
use serde::Serialize;

pub const PLATFORM_FIELD: &str = "platform";
pub const FIXTURE_ID_FIELD: &str = "fixtureId";
pub const ITERATION_COUNT_FIELD: &str = "iterationCount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorter {
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Column {
    Leaf {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        field: String,
        visible: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        sorter: Option<Sorter>,
    },
    Group {
        title: String,
        columns: Vec<Column>,
    },
}

impl Column {
    pub fn leaf(title: impl Into<String>, field: impl Into<String>) -> Self {
        Column::Leaf {
            title: Some(title.into()),
            field: field.into(),
            visible: true,
            sorter: None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Column::Leaf { title, .. } => title.as_deref(),
            Column::Group { title, .. } => Some(title.as_str()),
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Column::Leaf { visible, .. } => *visible,
            Column::Group { .. } => true,
        }
    }

    /// Leaf columns in display order.
    pub fn leaves(&self) -> Vec<&Column> {
        match self {
            Column::Leaf { .. } => vec![self],
            Column::Group { columns, .. } => columns.iter().flat_map(Column::leaves).collect(),
        }
    }
}

/// One sub-column per step, in declared order, plus the totals sub-column.
fn step_group(indicator: IndicatorId, steps: &[String], catalog: &IndicatorCatalog) -> Column {
    let mut columns: Vec<Column> = steps
        .iter()
        .map(|step| Column::leaf(step.as_str(), indicator.step_field(step)))
        .collect();
    columns.push(Column::leaf(TOTAL_DURATION_STEP_TITLE, indicator.total_field()));

    Column::Group {
        title: catalog.name(indicator).to_string(),
        columns,
    }
}

/// Builds the column tree for a family with `steps`.
///
/// The failure reason column is always present, even if no fixture failed.
pub fn build_columns(
    steps: &[String],
    element_count_known: bool,
    catalog: &IndicatorCatalog,
) -> Vec<Column> {
    let mut columns = vec![
        Column::Leaf {
            title: None,
            field: PLATFORM_FIELD.to_string(),
            visible: false,
            sorter: Some(Sorter::String),
        },
        Column::Leaf {
            title: Some("Device/Algorithm".to_string()),
            field: FIXTURE_ID_FIELD.to_string(),
            visible: true,
            sorter: Some(Sorter::String),
        },
        Column::leaf("Iteration count", ITERATION_COUNT_FIELD),
        Column::leaf(
            catalog.name(IndicatorId::Failure),
            IndicatorId::Failure.as_str(),
        ),
        step_group(IndicatorId::Duration, steps, catalog),
    ];

    if element_count_known {
        columns.push(step_group(IndicatorId::ElementProcessingTime, steps, catalog));
        columns.push(Column::leaf(
            catalog.name(IndicatorId::Throughput),
            IndicatorId::Throughput.as_str(),
        ));
    }

    columns
}
