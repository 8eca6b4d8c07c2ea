use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use seoqa::report::{self, html, xlsx, Summary};
use seoqa::{AuditInput, Config, Event, LiveReport, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seoqa")]
#[command(author, version, about = "Build, review and export SEO / image alt-text QA reports")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Settings file (default: ./seoqa.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the interactive report page
    Generate {
        /// Audit input (JSON)
        input: PathBuf,

        /// Output file (.html, or .xlsx for a workbook)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for auto-named reports
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Don't open the report afterwards
        #[arg(long)]
        no_open: bool,
    },

    /// Write the static HTML and/or Excel export
    Export {
        /// Audit input (JSON)
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "both")]
        format: ExportFormat,

        /// JSON array of edit/click events to apply before exporting
        #[arg(long)]
        events: Option<PathBuf>,

        /// Directory to write exports into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Start the interactive review server
    Serve {
        /// Audit input (JSON)
        input: PathBuf,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Html,
    Xlsx,
    Both,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Generate { input, output, report_dir, no_open } => {
            let audit = AuditInput::load(&input)?;
            let live = LiveReport::new(audit.build());

            let output_path = match output {
                Some(path) => path,
                None => {
                    let dir = report_dir.unwrap_or_else(|| config.report_dir.clone());
                    std::fs::create_dir_all(&dir)?;
                    let first_url = audit.urls().next().unwrap_or("");
                    let name = report::report_file_name(&audit.ticket_name, first_url, Local::now().date_naive());
                    dir.join(report::disk_file_name(&name))
                }
            };

            report::generate(&output_path, live.report())?;
            if !args.quiet {
                print_summary(&Summary::from_report(live.report()));
            }
            info!(path = %output_path.display(), "report saved");

            if config.open_browser && !no_open {
                open_file(&output_path);
            }
        }

        Command::Export { input, format, events, out_dir } => {
            let audit = AuditInput::load(&input)?;
            let mut live = LiveReport::new(audit.build());

            if let Some(events_path) = events {
                let events: Vec<Event> = serde_json::from_str(&std::fs::read_to_string(&events_path)?)?;
                let applied = live.replay(&events)?;
                info!(applied, "events applied");
            }

            let report = live.into_report();
            let dir = out_dir.unwrap_or_else(|| config.report_dir.clone());
            std::fs::create_dir_all(&dir)?;

            if matches!(format, ExportFormat::Html | ExportFormat::Both) {
                let export = html::export_static(&report);
                let path = dir.join(report::disk_file_name(&export.file_name));
                std::fs::write(&path, export.html)?;
                info!(path = %path.display(), "static report saved");
            }
            if matches!(format, ExportFormat::Xlsx | ExportFormat::Both) {
                let path = xlsx::write_to_dir(&report, &dir)?;
                info!(path = %path.display(), "workbook saved");
            }
        }

        Command::Serve { input, port, no_open } => {
            let audit = AuditInput::load(&input)?;
            let live = LiveReport::new(audit.build());
            let port = port.unwrap_or(config.port);
            seoqa::serve::start(port, live, config.open_browser && !no_open)?;
        }
    }

    Ok(())
}

fn print_summary(summary: &Summary) {
    eprintln!("\n\x1b[1mSummary:\x1b[0m");
    eprintln!("  Pages:          {}", summary.pages);
    eprintln!("  \x1b[31mSEO issues:\x1b[0m     {} / {}", summary.seo_issues, summary.seo_rows);
    eprintln!("  \x1b[31mAlt issues:\x1b[0m     {} / {}", summary.image_issues, summary.images);
}

fn open_file(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!(path = %path.display(), error = %e, "failed to open report");
    }
}
