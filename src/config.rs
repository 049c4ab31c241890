//! Loader layout configuration.

/// Name given to the merged date + time column.
pub const TIMESTAMP_COLUMN: &str = "date_and_time";

/// Where the raw date and time live in an eBird "My Data" export (0-indexed).
pub const DATE_POSITION: usize = 11;
pub const TIME_POSITION: usize = 12;

/// Columns kept after loading, in output order.
pub const DEFAULT_COLUMNS: [&str; 9] = [
    TIMESTAMP_COLUMN,
    "Submission ID",
    "Common Name",
    "Count",
    "State/Province",
    "County",
    "Location",
    "Date",
    "Time",
];

/// Header renames applied before lower-casing.
pub const DEFAULT_RENAMES: [(&str, &str); 3] = [
    ("Submission ID", "id"),
    ("Common Name", "common"),
    ("State/Province", "state"),
];

/// Candidate names for the date column used by the filter, in priority order.
pub const DATE_COLUMN_CANDIDATES: [&str; 2] = ["Date", "date"];

/// Sentinel in the count column meaning "present, not counted".
pub const PRESENT_SENTINEL: &str = "X";

/// Where to find the raw date and time fields and what to call the merged column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub timestamp_column: String,
    pub date_position: usize,
    pub time_position: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timestamp_column: TIMESTAMP_COLUMN.to_string(),
            date_position: DATE_POSITION,
            time_position: TIME_POSITION,
        }
    }
}

impl LoaderConfig {
    /// Smallest header width that still contains both raw fields.
    pub fn min_columns(&self) -> usize {
        self.date_position.max(self.time_position) + 1
    }

    /// `DEFAULT_COLUMNS` with the merged column under its configured name.
    pub fn kept_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = DEFAULT_COLUMNS.to_vec();
        columns[0] = self.timestamp_column.as_str();
        columns
    }
}
