use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{ChecklistError, Result};

/// A single cell of a checklist table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form used for comparisons and grouping. Null renders as "".
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    /// Empty strings become `Null`, matching how the loader treats blank fields.
    fn from(raw: &str) -> Self {
        if raw.is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

/// An owned, rectangular table of checklist records.
///
/// Transforms take `&Table` and build a new one, so a table is never
/// modified once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ChecklistError::malformed(format!(
                "row {index} has {} fields, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Exact match first, then an ASCII case-insensitive match.
    pub fn column_index_ci(&self, name: &str) -> Option<usize> {
        self.column_index(name).or_else(|| {
            self.columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
        })
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ChecklistError::missing_column(name))
    }

    pub fn require_column_ci(&self, name: &str) -> Result<usize> {
        self.column_index_ci(name)
            .ok_or_else(|| ChecklistError::missing_column(name))
    }

    /// First candidate present in the header, in the order given.
    pub fn resolve_column(&self, candidates: &[&str]) -> Result<usize> {
        candidates
            .iter()
            .find_map(|name| self.column_index(name))
            .ok_or_else(|| {
                ChecklistError::schema(format!(
                    "none of the columns {candidates:?} are present"
                ))
            })
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

/// How often one species shows up across checklists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesFrequency {
    pub name: String,
    pub occurrences: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub checklist_count: usize,
    pub entries: Vec<SpeciesFrequency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::from("1")]],
        )
        .unwrap_err();
        assert!(matches!(err, ChecklistError::MalformedInput(_)));
    }

    #[test]
    fn case_insensitive_lookup_prefers_exact_match() {
        let table = Table::new(
            vec!["count".to_string(), "Count".to_string()],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(table.column_index_ci("Count"), Some(1));
        assert_eq!(table.column_index_ci("COUNT"), Some(0));
        assert_eq!(table.column_index_ci("total"), None);
    }

    #[test]
    fn resolve_column_follows_candidate_order() {
        let table = Table::new(
            vec!["date".to_string(), "Date".to_string()],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(table.resolve_column(&["Date", "date"]).unwrap(), 1);
        assert!(matches!(
            table.resolve_column(&["Day"]),
            Err(ChecklistError::SchemaError(_))
        ));
    }

    #[test]
    fn text_form_of_values() {
        let date = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();
        assert_eq!(Value::Date(date).as_text(), "2021-05-01");
        assert_eq!(
            Value::DateTime(date.and_hms_opt(12, 32, 0).unwrap()).as_text(),
            "2021-05-01 12:32:00"
        );
        assert_eq!(Value::Integer(42).as_text(), "42");
        assert_eq!(Value::Null.as_text(), "");
        assert_eq!(Value::from(""), Value::Null);
    }
}
