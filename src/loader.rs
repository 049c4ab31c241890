use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{ChecklistError, Result};
use crate::models::{Table, Value};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 3] = ["%I:%M %p", "%H:%M", "%H:%M:%S"];

/// Load an export using the standard eBird column layout.
pub fn load(source: &Path) -> Result<Table> {
    load_with(source, &LoaderConfig::default())
}

pub fn load_with(source: &Path, config: &LoaderConfig) -> Result<Table> {
    let file = File::open(source).map_err(|err| ChecklistError::ResourceNotFound {
        path: source.to_path_buf(),
        source: err,
    })?;
    let table = load_from_reader(file, config)?;
    debug!(path = %source.display(), rows = table.len(), "loaded checklist export");
    Ok(table)
}

/// Parse CSV from any reader. The merged timestamp column is placed first,
/// followed by every source column unchanged.
pub fn load_from_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Table> {
    let mut reader = ReaderBuilder::new().from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ChecklistError::malformed(format!("failed to read CSV header: {e}")))?
        .clone();

    if headers.len() < config.min_columns() {
        return Err(ChecklistError::malformed(format!(
            "header has {} columns, need at least {} for date at position {} and time at position {}",
            headers.len(),
            config.min_columns(),
            config.date_position,
            config.time_position
        )));
    }

    let mut columns = Vec::with_capacity(headers.len() + 1);
    columns.push(config.timestamp_column.clone());
    columns.extend(headers.iter().map(str::to_string));

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| ChecklistError::malformed(format!("row {}: {e}", index + 1)))?;
        rows.push(parse_row(&record, config));
    }

    Table::new(columns, rows)
}

fn parse_row(record: &StringRecord, config: &LoaderConfig) -> Vec<Value> {
    let raw_date = record.get(config.date_position).unwrap_or("");
    let raw_time = record.get(config.time_position).unwrap_or("");

    let mut row = Vec::with_capacity(record.len() + 1);
    row.push(combine_timestamp(raw_date, raw_time));
    row.extend(record.iter().map(Value::from));
    row
}

/// Merge the raw date and time fields. A missing or unreadable time keeps
/// just the date; an unreadable date keeps the raw text.
pub fn combine_timestamp(raw_date: &str, raw_time: &str) -> Value {
    let raw_date = raw_date.trim();
    let raw_time = raw_time.trim();

    if raw_date.is_empty() && raw_time.is_empty() {
        return Value::Null;
    }

    let Some(date) = parse_date(raw_date) else {
        return Value::Text(format!("{raw_date} {raw_time}").trim().to_string());
    };

    match parse_time(raw_time) {
        Some(time) => Value::DateTime(date.and_time(time)),
        None => Value::Date(date),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

/// Keep exactly `columns`, in the order given.
pub fn keep_columns(table: &Table, columns: &[&str]) -> Result<Table> {
    let indices = columns
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;

    let rows = table
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// Apply `renames` (old, new) and then lower-case every header.
pub fn rename_and_lowercase(table: &Table, renames: &[(&str, &str)]) -> Result<Table> {
    let columns = table
        .columns()
        .iter()
        .map(|column| {
            renames
                .iter()
                .find(|(old, _)| *old == column.as_str())
                .map_or(column.as_str(), |(_, new)| *new)
                .to_lowercase()
        })
        .collect();

    Table::new(columns, table.rows().to_vec())
}

pub fn select_and_normalize(
    table: &Table,
    columns: &[&str],
    renames: &[(&str, &str)],
) -> Result<Table> {
    let kept = keep_columns(table, columns)?;
    rename_and_lowercase(&kept, renames)
}
