use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use influxwatch::report;
use influxwatch::{default_check_map_path, load_check_map, overall, CheckRun, Runner, Settings};
use influxwatch::{CheckError, Severity};

#[derive(Parser, Debug)]
#[command(name = "influxwatch")]
#[command(about = "Check feature availability recorded in InfluxDB, Nagios style")]
struct Args {
    /// Path to the check map JSON file
    /// (default: <customer>_check_map.json when --customer is given)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Customer to check; all customers in the check map when omitted
    #[arg(short = 'C', long)]
    customer: Option<String>,

    /// Increase verbosity (-v: per-check lines, -vv: debug logging)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Settings file for the backend connection (TOML, YAML or JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Also write the full report as JSON to this file
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(severity) => ExitCode::from(severity.exit_code()),
        Err(e) => {
            let severity = e
                .downcast_ref::<CheckError>()
                .map_or(Severity::Unknown, CheckError::severity);
            println!("{} - {:#}", severity, e);
            ExitCode::from(severity.exit_code())
        }
    }
}

/// Logs go to stderr; stdout is reserved for the supervisor.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<Severity> {
    let settings = Settings::load(args.settings.as_deref())?;

    let path = match (&args.config, &args.customer) {
        (Some(path), _) => path.clone(),
        (None, Some(customer)) => default_check_map_path(customer),
        (None, None) => bail!("either --config or --customer is required"),
    };
    let map = load_check_map(&path)?;

    let runner = Runner::new(settings.adapter()?);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let runs = rt.block_on(async {
        match &args.customer {
            Some(name) => runner.run_customer(&map, name).await.map(|run| vec![run]),
            None => runner.run_all(&map).await,
        }
    })?;

    let overall =
        overall(&runs).ok_or_else(|| anyhow!("no customers configured in {}", path.display()))?;

    print_report(&runs, overall, args.verbose, args.customer.is_none());

    if let Some(export_path) = &args.export {
        export_to_file(export_path, &runs, overall)?;
    }

    Ok(overall)
}

fn print_report(runs: &[CheckRun], overall: Severity, verbose: u8, all_customers: bool) {
    if all_customers {
        println!("{}", report::overall_line(overall, runs));
    }
    for run in runs {
        println!("{}", report::status_line(run));
        if verbose > 0 {
            for line in report::detail_lines(run) {
                println!("{}", line);
            }
        }
    }
}

/// Write the JSON report to a file
fn export_to_file(export_path: &Path, runs: &[CheckRun], overall: Severity) -> Result<()> {
    let json = serde_json::to_string_pretty(&report::to_json(runs, overall))?;
    std::fs::write(export_path, json)?;
    tracing::info!("exported report to {}", export_path.display());
    Ok(())
}
