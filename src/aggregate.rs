use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ChecklistError, Result};
use crate::models::{FrequencyReport, SpeciesFrequency, Table};

/// Sum of an integer column. The column must already have been cleaned.
pub fn total_count(table: &Table, column: &str) -> Result<i64> {
    let index = table.require_column_ci(column)?;
    let name = &table.columns()[index];

    table
        .column_values(index)
        .enumerate()
        .try_fold(0i64, |total, (row, value)| {
            let n = value
                .as_integer()
                .ok_or_else(|| ChecklistError::TypeCoercionError {
                    column: name.clone(),
                    row,
                    value: value.to_string(),
                })?;
            total.checked_add(n).ok_or_else(|| ChecklistError::CountOverflow {
                column: name.clone(),
                row,
            })
        })
}

/// Count rows per `group_column` value and express each count as a fraction
/// of the distinct checklists in `checklist_id_column`.
///
/// Entries are ordered by occurrences, most first, with ties broken by name.
pub fn frequency_report(
    table: &Table,
    group_column: &str,
    checklist_id_column: &str,
    top_n: Option<usize>,
) -> Result<FrequencyReport> {
    let group = table.require_column_ci(group_column)?;
    let checklist = table.require_column_ci(checklist_id_column)?;

    let checklist_count = table
        .column_values(checklist)
        .filter(|v| !v.is_null())
        .map(|v| v.as_text())
        .collect::<HashSet<_>>()
        .len();

    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for value in table.column_values(group).filter(|v| !v.is_null()) {
        *occurrences.entry(value.as_text().into_owned()).or_insert(0) += 1;
    }

    let mut entries: Vec<SpeciesFrequency> = occurrences
        .into_iter()
        .map(|(name, count)| SpeciesFrequency {
            name,
            occurrences: count,
            fraction: if checklist_count == 0 {
                0.0
            } else {
                count as f64 / checklist_count as f64
            },
        })
        .collect();

    entries.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!(
        checklist_count,
        species = entries.len(),
        "computed species frequency"
    );

    if let Some(n) = top_n {
        entries.truncate(n);
    }

    Ok(FrequencyReport {
        checklist_count,
        entries,
    })
}
