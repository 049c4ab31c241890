use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{frequency_report, total_count};
use crate::cleaner::{combine_region, drop_columns, drop_value, rename_column};
use crate::config::{LoaderConfig, DEFAULT_RENAMES, PRESENT_SENTINEL};
use crate::error::Result;
use crate::filter::{filter_by_date, DateRange};
use crate::loader::{load_with, select_and_normalize};
use crate::models::{FrequencyReport, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_birds: i64,
    pub frequency: FrequencyReport,
}

/// Load, normalise and window an export: the table both statistics start from.
pub fn prepare(source: &Path, config: &LoaderConfig, range: &DateRange) -> Result<Table> {
    let raw = load_with(source, config)?;
    let birds = select_and_normalize(&raw, &config.kept_columns(), &DEFAULT_RENAMES)?;
    let birds = filter_by_date(&birds, range)?;

    let birds = drop_columns(&birds, &["date", "time"])?;
    let birds = rename_column(&birds, &config.timestamp_column.to_lowercase(), "time")?;
    let birds = combine_region(&birds)?;

    debug!(rows = birds.len(), columns = ?birds.columns(), "prepared checklist table");
    Ok(birds)
}

/// Total of enumerated birds; "X" rows are left out of the sum.
pub fn total_birds(birds: &Table) -> Result<i64> {
    let counted = drop_value(birds, "count", PRESENT_SENTINEL)?;
    total_count(&counted, "count")
}

/// Species frequency. "X" rows still count as a report of the species.
pub fn species_frequency(birds: &Table, top_n: Option<usize>) -> Result<FrequencyReport> {
    frequency_report(birds, "common", "id", top_n)
}

pub fn summarize(
    source: &Path,
    config: &LoaderConfig,
    range: &DateRange,
    top_n: Option<usize>,
) -> Result<Summary> {
    let birds = prepare(source, config, range)?;
    let total = total_birds(&birds)?;
    let frequency = species_frequency(&birds, top_n)?;

    info!(
        rows = birds.len(),
        total_birds = total,
        checklists = frequency.checklist_count,
        "summarized checklists"
    );

    Ok(Summary {
        total_birds: total,
        frequency,
    })
}
