use clap::ValueEnum;

pub mod columns;
pub mod display;
pub mod duration;
pub mod error;
pub mod indicators;
pub mod loader;
pub mod resolve;
pub mod sample;
pub mod schema;
pub mod units;
pub mod view;

pub use error::{ReportError, Result};
pub use view::{render, ViewConfig, ViewModel};

/// How a rendered view is written out.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Text tables, one per fixture family, grouped by platform.
    #[default]
    Table,
    /// Row records and the column tree as JSON, for an external table widget.
    Json,
}
