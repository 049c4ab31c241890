use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use checklist_stats::config::{LoaderConfig, DATE_POSITION, TIME_POSITION};
use checklist_stats::{pipeline, report, ChecklistError, DateRange};

#[derive(Parser)]
#[command(name = "checklist-stats")]
#[command(about = "Total birds and most frequently reported species from an eBird export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total number of birds counted
    Total {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        window: Window,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Species ranked by the share of checklists reporting them
    Frequency {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        window: Window,
        #[arg(long, default_value_t = 25)]
        top: usize,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Generate a markdown report with both summaries
    Report {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        window: Window,
        #[arg(long, default_value_t = 25)]
        top: usize,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Source {
    /// eBird "My Data" CSV export
    #[arg(long)]
    csv: PathBuf,
    /// 0-indexed position of the raw date column
    #[arg(long, default_value_t = DATE_POSITION)]
    date_position: usize,
    /// 0-indexed position of the raw time column
    #[arg(long, default_value_t = TIME_POSITION)]
    time_position: usize,
}

impl Source {
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            date_position: self.date_position,
            time_position: self.time_position,
            ..LoaderConfig::default()
        }
    }
}

#[derive(Args)]
struct Window {
    /// Calendar year to keep
    #[arg(long, conflicts_with_all = ["start", "end"])]
    year: Option<i32>,
    /// First date to keep, yyyy-mm-dd
    #[arg(long)]
    start: Option<String>,
    /// Last date to keep, yyyy-mm-dd
    #[arg(long)]
    end: Option<String>,
}

impl Window {
    fn range(&self) -> DateRange {
        DateRange {
            start: self.start.clone(),
            end: self.end.clone(),
            year: self.year,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// sysexits-style codes for the core's error kinds.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ChecklistError>() {
        Some(ChecklistError::ConflictingArguments(_)) => 64,
        Some(ChecklistError::MalformedInput(_))
        | Some(ChecklistError::SchemaError(_))
        | Some(ChecklistError::TypeCoercionError { .. })
        | Some(ChecklistError::CountOverflow { .. }) => 65,
        Some(ChecklistError::ResourceNotFound { .. }) => 66,
        None => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Total {
            source,
            window,
            format,
        } => {
            let range = window.range();
            let birds = pipeline::prepare(&source.csv, &source.loader_config(), &range)?;
            let total = pipeline::total_birds(&birds)?;

            match format {
                Format::Text => println!("{}", report::total_line(total, &range)),
                Format::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "total_birds": total }))?
                ),
            }
        }
        Commands::Frequency {
            source,
            window,
            top,
            format,
        } => {
            let range = window.range();
            let birds = pipeline::prepare(&source.csv, &source.loader_config(), &range)?;
            let frequency = pipeline::species_frequency(&birds, Some(top))?;

            match format {
                Format::Text => {
                    println!("Top species {}:", report::window_label(&range));
                    print!("{}", report::frequency_table(&frequency));
                }
                Format::Json => println!("{}", serde_json::to_string_pretty(&frequency)?),
            }
        }
        Commands::Report {
            source,
            window,
            top,
            out,
        } => {
            let range = window.range();
            if range.is_unbounded() {
                debug!("no date window given, using every checklist");
            }
            let summary =
                pipeline::summarize(&source.csv, &source.loader_config(), &range, Some(top))?;
            let markdown = report::build_report(&range, summary.total_birds, &summary.frequency);

            match out {
                Some(path) => {
                    std::fs::write(&path, markdown)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "report written");
                    println!("Report written to {}.", path.display());
                }
                None => print!("{markdown}"),
            }
        }
    }

    Ok(())
}
