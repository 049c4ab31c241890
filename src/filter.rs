//! Date-window selection.
//!
//! Dates are compared as strings. That orders correctly only for zero-padded
//! `yyyy-mm-dd` values, which is what eBird exports and what callers must pass.

use tracing::debug;

use crate::config::DATE_COLUMN_CANDIDATES;
use crate::error::{ChecklistError, Result};
use crate::models::Table;

/// Requested window. Either `year` alone, or any combination of `start` and
/// `end`; both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
    pub year: Option<i32>,
}

impl DateRange {
    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn between(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start,
            end,
            year: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.year.is_none()
    }

    /// Inclusive lower and upper bounds; `None` means open on that side.
    pub fn bounds(&self) -> Result<(Option<String>, Option<String>)> {
        match self.year {
            Some(year) => {
                if self.start.is_some() || self.end.is_some() {
                    return Err(ChecklistError::conflicting(
                        "year cannot be combined with a start or end date",
                    ));
                }
                Ok((
                    Some(format!("{year:04}-01-01")),
                    Some(format!("{year:04}-12-31")),
                ))
            }
            None => Ok((self.start.clone(), self.end.clone())),
        }
    }
}

pub fn filter_by_date(table: &Table, range: &DateRange) -> Result<Table> {
    let (start, end) = range.bounds()?;
    if start.is_none() && end.is_none() {
        return Ok(table.clone());
    }

    let date_col = table.resolve_column(&DATE_COLUMN_CANDIDATES)?;

    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|row| {
            let value = &row[date_col];
            if value.is_null() {
                return false;
            }
            let text = value.as_text();
            let date: &str = &text;
            let after_start = start.as_deref().map_or(true, |s| date >= s);
            let before_end = end.as_deref().map_or(true, |e| date <= e);
            after_start && before_end
        })
        .cloned()
        .collect();

    debug!(
        start = start.as_deref().unwrap_or("-"),
        end = end.as_deref().unwrap_or("-"),
        kept = rows.len(),
        dropped = table.len() - rows.len(),
        "filtered by date"
    );

    Table::new(table.columns().to_vec(), rows)
}

pub fn focus_on_year(table: &Table, year: i32) -> Result<Table> {
    filter_by_date(table, &DateRange::year(year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    fn dataset(date_header: &str) -> Table {
        Table::new(
            vec![
                "Submission ID".to_string(),
                "Common Name".to_string(),
                "Count".to_string(),
                date_header.to_string(),
            ],
            vec![
                vec!["1234".into(), "Bob".into(), "100".into(), "2021-05-01".into()],
                vec!["2345".into(), "Joe".into(), "X".into(), "2020-06-01".into()],
                vec!["3456".into(), "Mary".into(), "300".into(), "2020-07-01".into()],
                vec!["4567".into(), "Mary".into(), "400".into(), "2019-08-01".into()],
            ],
        )
        .unwrap()
    }

    fn ids(table: &Table) -> Vec<String> {
        table
            .column_values(0)
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    #[test]
    fn no_bounds_is_identity() {
        let table = dataset("Date");
        assert_eq!(filter_by_date(&table, &DateRange::default()).unwrap(), table);
    }

    #[test]
    fn no_bounds_does_not_need_a_date_column() {
        let table = dataset("When");
        assert_eq!(filter_by_date(&table, &DateRange::default()).unwrap(), table);
    }

    #[test]
    fn year_keeps_rows_in_order() {
        let filtered = focus_on_year(&dataset("Date"), 2020).unwrap();
        assert_eq!(ids(&filtered), ["2345", "3456"]);
        assert_eq!(filtered.rows()[0][2], Value::from("X"));
    }

    #[test]
    fn lowercase_date_column_is_used_as_fallback() {
        let filtered = focus_on_year(&dataset("date"), 2019).unwrap();
        assert_eq!(ids(&filtered), ["4567"]);
    }

    #[test]
    fn missing_date_column_is_schema_error() {
        let err = focus_on_year(&dataset("When"), 2020).unwrap_err();
        assert!(matches!(err, ChecklistError::SchemaError(_)));
    }

    #[test]
    fn year_with_start_conflicts() {
        let range = DateRange {
            start: Some("2020-01-01".to_string()),
            end: None,
            year: Some(2020),
        };
        let err = filter_by_date(&dataset("Date"), &range).unwrap_err();
        assert!(matches!(err, ChecklistError::ConflictingArguments(_)));
    }

    #[test]
    fn year_with_end_conflicts() {
        let range = DateRange {
            start: None,
            end: Some("2020-12-31".to_string()),
            year: Some(2020),
        };
        let err = filter_by_date(&dataset("Date"), &range).unwrap_err();
        assert!(matches!(err, ChecklistError::ConflictingArguments(_)));
    }

    #[test]
    fn open_ended_windows_are_inclusive() {
        let table = dataset("Date");

        let from = filter_by_date(&table, &DateRange::between(Some("2020-07-01".into()), None)).unwrap();
        assert_eq!(ids(&from), ["1234", "3456"]);

        let until = filter_by_date(&table, &DateRange::between(None, Some("2020-06-01".into()))).unwrap();
        assert_eq!(ids(&until), ["2345", "4567"]);
    }

    #[test]
    fn comparison_is_lexicographic() {
        // "2020-6-15" sorts after "2020-12-31" as text, so it falls outside
        let table = Table::new(
            vec!["Date".to_string()],
            vec![vec!["2020-6-15".into()], vec!["2020-11-02".into()]],
        )
        .unwrap();
        let filtered = focus_on_year(&table, 2020).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0][0], Value::from("2020-11-02"));
    }

    #[test]
    fn null_dates_are_excluded_from_bounded_windows() {
        let table = Table::new(
            vec!["Date".to_string()],
            vec![vec![Value::Null], vec!["2021-01-01".into()]],
        )
        .unwrap();
        let filtered = filter_by_date(&table, &DateRange::between(None, Some("2099-01-01".into()))).unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
