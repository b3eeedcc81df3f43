//! Estimate End Dates - research project maintenance
//!
//! Assigns a presumed end date to every listed project that lacks one and
//! records everything it does in an append-only log file.
//!
//! Exit codes:
//! - 0: Run completed (individual API failures are in the log)
//! - 1: Operator canceled at the confirmation prompt
//! - 2: Error occurred

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use estimate_end_dates::{
    execute, prompt_credentials, read_identifiers, AuditLog, PureClient, RunSummary, Terminal,
};

const DEFAULT_INPUT: &str = "enddates.xlsx";
const LOG_FILE_NAME: &str = "project_update.log";

#[derive(Parser, Debug)]
#[command(name = "estimate_end_dates")]
#[command(about = "Assign presumed end dates to projects that have none")]
struct Args {
    /// Spreadsheet with a UUID column (.xlsx, .xls, .ods or .csv)
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Audit log, appended to on every run [default: next to the executable]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show every audit line on the console
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors on the console
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(Some(_)) => 0,
        Ok(None) => 1,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> anyhow::Result<Option<RunSummary>> {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose)?;

    let mut terminal = Terminal;
    let credentials = prompt_credentials(&mut terminal)?;

    let ids = read_identifiers(&args.input)?;

    let log_path = match args.log_file {
        Some(path) => path,
        None => default_log_path()?,
    };
    let mut audit = AuditLog::open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let client = PureClient::new(&credentials).context("failed to set up API client")?;

    let summary = execute(&mut terminal, &ids, &client, &mut audit, &credentials.username)
        .await
        .with_context(|| format!("failed to write to log file {}", log_path.display()))?;

    if let Some(summary) = &summary {
        print_summary(summary, &log_path);
    }
    Ok(summary)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))
}

fn default_log_path() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.join(LOG_FILE_NAME))
}

fn print_summary(summary: &RunSummary, log_path: &std::path::Path) {
    println!();
    println!("SUMMARY");
    println!("=======");
    println!("Total projects modified: {}", summary.modified);
    println!("  Updated with note:      {}", summary.updated);
    println!("  End date write failed:  {}", summary.update_failed);
    println!("  Note failed:            {}", summary.note_failed);
    println!("  Already had end date:   {}", summary.skipped_has_end_date);
    println!("  No usable start date:   {}", summary.skipped_no_start_date);
    println!("  Fetch failed:           {}", summary.fetch_failed);
    println!("Log: {}", log_path.display());
}
