//! Writes a [`ViewModel`] out, either as text tables or as JSON for an external
//! table widget.

use crate::columns::Column;
use crate::view::{FamilyTable, Row, ViewModel};
use crate::OutputFormat;
use std::io::{self, Write};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Group label of rows whose platform could not be resolved.
pub const UNDEFINED_GROUP: &str = "undefined";

pub fn write_view<W: Write>(view: &ViewModel, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Table => out.write_all(render_text(view).as_bytes()),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, view).map_err(io::Error::other)?;
            writeln!(out)
        }
    }
}

pub fn render_text(view: &ViewModel) -> String {
    let mut text = format!("{}\n", view.caption());
    for table in &view.tables {
        text.push('\n');
        text.push_str(&render_table(table));
    }
    text
}

/// Rows grouped by platform, groups in order of first appearance.
pub fn group_rows(rows: &[Row]) -> Vec<(&str, Vec<&Row>)> {
    let mut groups: Vec<(&str, Vec<&Row>)> = Vec::new();
    for row in rows {
        let key = row.platform.as_deref().unwrap_or(UNDEFINED_GROUP);
        match groups.iter_mut().find(|(name, _)| *name == key) {
            Some((_, members)) => members.push(row),
            None => groups.push((key, vec![row])),
        }
    }
    groups
}

fn render_table(table: &FamilyTable) -> String {
    // (group title, leaf) for every visible leaf column
    let leaves: Vec<(&str, &Column)> = table
        .columns
        .iter()
        .flat_map(|column| {
            let group = match column {
                Column::Group { title, .. } => title.as_str(),
                Column::Leaf { .. } => "",
            };
            column.leaves().into_iter().map(move |leaf| (group, leaf))
        })
        .filter(|(_, leaf)| leaf.is_visible())
        .collect();

    let mut text = format!("{}\n", table.name);
    for (platform, rows) in group_rows(&table.rows) {
        let mut builder = Builder::default();
        builder.push_record(leaves.iter().map(|(group, _)| group.to_string()));
        builder.push_record(
            leaves
                .iter()
                .map(|(_, leaf)| leaf.title().unwrap_or_default().to_string()),
        );
        for row in rows.iter() {
            builder.push_record(leaves.iter().map(|(_, leaf)| cell_text(row, leaf)));
        }

        let mut rendered = builder.build();
        rendered.with(Style::modern());
        text.push_str(&format!("{platform} ({})\n{rendered}\n", rows.len()));
    }
    text
}

fn cell_text(row: &Row, column: &Column) -> String {
    match column {
        Column::Leaf { field, .. } => row.value(field).unwrap_or_default(),
        Column::Group { .. } => String::new(),
    }
}
