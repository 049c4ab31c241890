use std::fmt::Write;

use crate::filter::DateRange;
use crate::models::FrequencyReport;

/// Human wording for the window a summary covers.
pub fn window_label(range: &DateRange) -> String {
    if let Some(year) = range.year {
        return format!("in {year}");
    }
    match (&range.start, &range.end) {
        (Some(start), Some(end)) => format!("between {start} and {end}"),
        (Some(start), None) => format!("since {start}"),
        (None, Some(end)) => format!("through {end}"),
        (None, None) => "across all checklists".to_string(),
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn total_line(total: i64, range: &DateRange) -> String {
    format!(
        "I reported {} birds {}.",
        format_thousands(total),
        window_label(range)
    )
}

/// Plain-text species table for the terminal.
pub fn frequency_table(report: &FrequencyReport) -> String {
    let mut output = String::new();

    if report.entries.is_empty() {
        let _ = writeln!(output, "No species reported in this window.");
        return output;
    }

    let width = report
        .entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("common".len());

    let _ = writeln!(
        output,
        "{:>4}  {:<width$}  {:>6}  {:>9}",
        "rank", "common", "count", "frequency"
    );
    for (rank, entry) in report.entries.iter().enumerate() {
        let _ = writeln!(
            output,
            "{:>4}  {:<width$}  {:>6}  {:>9.4}",
            rank + 1,
            entry.name,
            entry.occurrences,
            entry.fraction
        );
    }
    let _ = writeln!(output, "across {} checklists", report.checklist_count);

    output
}

pub fn build_report(range: &DateRange, total: i64, frequency: &FrequencyReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Birding Checklist Summary");
    let _ = writeln!(
        output,
        "Generated {} from {} checklists",
        window_label(range),
        frequency.checklist_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Total Birds");
    let _ = writeln!(output, "{}", total_line(total, range));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Frequently Reported Species");

    if frequency.entries.is_empty() {
        let _ = writeln!(output, "No species reported in this window.");
    } else {
        let _ = writeln!(output, "| # | Species | Checklists | Frequency |");
        let _ = writeln!(output, "|---|---------|------------|-----------|");
        for (rank, entry) in frequency.entries.iter().enumerate() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {:.1}% |",
                rank + 1,
                entry.name,
                entry.occurrences,
                entry.fraction * 100.0
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeciesFrequency;

    fn sample_report() -> FrequencyReport {
        FrequencyReport {
            checklist_count: 4,
            entries: vec![
                SpeciesFrequency {
                    name: "Mary".to_string(),
                    occurrences: 2,
                    fraction: 0.5,
                },
                SpeciesFrequency {
                    name: "Bob".to_string(),
                    occurrences: 1,
                    fraction: 0.25,
                },
            ],
        }
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-12345), "-12,345");
    }

    #[test]
    fn labels_follow_the_window() {
        assert_eq!(window_label(&DateRange::year(2021)), "in 2021");
        assert_eq!(
            window_label(&DateRange::between(Some("2021-01-01".into()), Some("2021-06-30".into()))),
            "between 2021-01-01 and 2021-06-30"
        );
        assert_eq!(window_label(&DateRange::default()), "across all checklists");
        assert_eq!(
            total_line(4321, &DateRange::year(2021)),
            "I reported 4,321 birds in 2021."
        );
    }

    #[test]
    fn table_lists_species_in_rank_order() {
        let table = frequency_table(&sample_report());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[1].contains("Mary"));
        assert!(lines[1].contains("0.5000"));
        assert!(lines[2].contains("Bob"));
        assert_eq!(lines[3], "across 4 checklists");
    }

    #[test]
    fn markdown_report_has_both_sections() {
        let report = build_report(&DateRange::year(2021), 800, &sample_report());
        assert!(report.contains("I reported 800 birds in 2021."));
        assert!(report.contains("| 1 | Mary | 2 | 50.0% |"));
        assert!(report.contains("| 2 | Bob | 1 | 25.0% |"));
    }

    #[test]
    fn empty_report_says_so() {
        let empty = FrequencyReport {
            checklist_count: 0,
            entries: Vec::new(),
        };
        assert!(build_report(&DateRange::default(), 0, &empty).contains("No species reported"));
    }
}
