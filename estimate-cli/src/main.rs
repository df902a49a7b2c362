use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use estimate_core::{ReportConfig, ReportKind, WizardSession};
use tracing::{debug, warn};

use estimate_cli::app::{self, RunRequest};
use estimate_cli::config::AppConfig;
use estimate_cli::{logging, prompt, utils};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Construction cost estimator.
///
/// Walks the estimation wizard interactively or from a scenario file, keeps
/// progress in the configured cache, and prints the resulting report.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cache backend (`memory` or `sqlite`). Overrides the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Cache connection string.
    /// For SQLite this is a file path (e.g. `estimate.db`) or `:memory:`.
    #[arg(long, global = true)]
    cache: Option<String>,

    /// Log filter, e.g. `debug` or `info,estimate_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a scenario CSV (`step,field,value`) and print the report.
    Run {
        #[arg(long)]
        scenario: PathBuf,

        /// Report to print: summary, detailed or quote.
        #[arg(long, default_value = "summary", value_parser = utils::parse_report_kind)]
        report: ReportKind,

        /// Also write the cost breakdown as CSV (a file, or a directory).
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Ignore saved progress and start from the first step.
        #[arg(long)]
        fresh: bool,
    },

    /// Answer the wizard step by step on the terminal.
    Interactive {
        #[arg(long, default_value = "quote", value_parser = utils::parse_report_kind)]
        report: ReportKind,
    },

    /// Show the estimation in progress.
    Show,

    /// Forget the estimation in progress.
    Reset,
}

// ─── logging ─────────────────────────────────────────────────────────────────

fn configure_logging(config: &AppConfig) -> anyhow::Result<()> {
    logging::init_default_logging();
    if let Some(level) = &config.log.level {
        logging::set_log_level(level)?;
    }
    if let Some(file) = &config.log.file {
        logging::enable_file_logging(file)?;
    }
    Ok(())
}

fn print_report(
    kind: ReportKind,
    snapshot: &estimate_core::ReportSnapshot,
    config: &ReportConfig,
) {
    let report = estimate_core::EstimateReport::build(kind, snapshot, config);
    println!("{report}");
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?.with_overrides(
        cli.backend,
        cli.cache,
        cli.log_level,
    );
    configure_logging(&config)?;

    debug!("connecting to {} cache", config.cache.backend);
    let cache = app::open_cache(&config.cache).await?;

    match cli.command {
        Command::Run {
            scenario,
            report,
            csv,
            fresh,
        } => {
            let request = RunRequest {
                scenario,
                kind: report,
                csv,
                fresh,
            };
            let outcome = app::run_scenario(cache, &request, &config.report).await?;
            println!("{}", outcome.report);
            for notice in &outcome.notices {
                eprintln!("{notice}");
            }
        }
        Command::Interactive { report } => {
            let mut session = WizardSession::mount(cache).await;
            let finished = prompt::run_interactive(&mut session, io::stdin().lock(), io::stdout())
                .await
                .context("interactive session failed")?;
            match finished {
                Some(snapshot) => print_report(report, &snapshot, &config.report),
                None => warn!("estimation left unfinished; run again to resume"),
            }
        }
        Command::Show => println!("{}", app::describe_saved(cache.as_ref()).await?),
        Command::Reset => app::reset(cache.as_ref()).await?,
    }

    Ok(())
}
