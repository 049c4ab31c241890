//! Summaries of a personal eBird checklist export: total birds counted and
//! how often each species shows up across checklists.

pub mod aggregate;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;

pub use error::{ChecklistError, Result};
pub use filter::DateRange;
pub use models::{FrequencyReport, SpeciesFrequency, Table, Value};
