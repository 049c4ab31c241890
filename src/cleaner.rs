use tracing::debug;

use crate::error::{ChecklistError, Result};
use crate::models::{Table, Value};

/// Drop every row whose `column` equals `sentinel` exactly, then coerce the
/// column to integers. The column name is matched case-insensitively but the
/// output keeps the header as it was.
pub fn drop_value(table: &Table, column: &str, sentinel: &str) -> Result<Table> {
    let index = table.require_column_ci(column)?;

    let rows: Vec<Vec<Value>> = table
        .rows()
        .iter()
        .filter(|row| row[index].as_text() != sentinel || row[index].is_null())
        .cloned()
        .collect();

    debug!(
        column = %table.columns()[index],
        sentinel,
        dropped = table.len() - rows.len(),
        "dropped sentinel rows"
    );

    let remaining = Table::new(table.columns().to_vec(), rows)?;
    coerce_integer(&remaining, column)
}

/// Convert every cell of `column` to a non-negative `Integer`.
pub fn coerce_integer(table: &Table, column: &str) -> Result<Table> {
    let index = table.require_column_ci(column)?;
    let name = &table.columns()[index];

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row_number, row)| {
            let count = to_count(&row[index]).ok_or_else(|| ChecklistError::TypeCoercionError {
                column: name.clone(),
                row: row_number,
                value: row[index].to_string(),
            })?;
            let mut row = row.clone();
            row[index] = Value::Integer(count);
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(table.columns().to_vec(), rows)
}

fn to_count(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(*n),
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .filter(|n| *n >= 0)
}

/// Remove the named columns. Every name must exist.
pub fn drop_columns(table: &Table, names: &[&str]) -> Result<Table> {
    let dropped = names
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;

    let keep: Vec<usize> = (0..table.columns().len())
        .filter(|i| !dropped.contains(i))
        .collect();

    let columns = keep.iter().map(|&i| table.columns()[i].clone()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Table::new(columns, rows)
}

pub fn rename_column(table: &Table, from: &str, to: &str) -> Result<Table> {
    let index = table.require_column(from)?;
    let mut columns = table.columns().to_vec();
    columns[index] = to.to_string();
    Table::new(columns, table.rows().to_vec())
}

/// Replace `state` and `county` with a single `county_state` column such as
/// "King, WA". The state keeps only its last two characters, which turns
/// eBird's "US-WA" into "WA".
pub fn combine_region(table: &Table) -> Result<Table> {
    let state = table.require_column("state")?;
    let county = table.require_column("county")?;

    let mut columns = table.columns().to_vec();
    columns.push("county_state".to_string());

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.push(region_label(&row[county], &row[state]));
            row
        })
        .collect();

    let widened = Table::new(columns, rows)?;
    drop_columns(&widened, &["state", "county"])
}

fn region_label(county: &Value, state: &Value) -> Value {
    if county.is_null() || state.is_null() {
        return Value::Null;
    }
    let state = state.as_text();
    let chars: Vec<char> = state.chars().collect();
    let code: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    Value::Text(format!("{}, {code}", county.as_text()))
}
