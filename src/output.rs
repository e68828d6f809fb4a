use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    tracing::debug!(path = %path.as_ref().display(), rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), s)?;
    tracing::debug!(path = %path.as_ref().display(), "wrote json");
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or a placeholder when empty.
pub fn render_preview<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_preview(rows, max_rows));
}
