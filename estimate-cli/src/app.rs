//! Commands behind the CLI, kept free of argument parsing so they can be
//! driven from tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use estimate_core::export::{Exporter, dispatch_exports};
use estimate_core::{
    CacheConfig, CacheRegistry, EstimateReport, ExportNotice, ExportOptions, FORM_DATA_KEY,
    FormCache, FormState, ReportConfig, ReportKind, ReportSnapshot, SavedForm, WizardSession, keys,
};
use estimate_data::{CsvBreakdownExporter, ReplaySummary, ScenarioLoader};
use estimate_db_sqlite::SqliteCacheFactory;
use tracing::{debug, info};

use crate::utils::{field_label, opt_euros_display};

/// Registry with every backend this binary ships.
pub fn build_registry() -> CacheRegistry {
    let mut registry = CacheRegistry::with_builtin();
    registry.register(Box::new(SqliteCacheFactory));
    registry
}

pub async fn open_cache(config: &CacheConfig) -> Result<Arc<dyn FormCache>> {
    debug!(backend = %config.backend, "opening form cache");
    let cache = build_registry()
        .create(config)
        .await
        .with_context(|| format!("cannot open '{}' cache", config.backend))?;
    Ok(Arc::from(cache))
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub scenario: PathBuf,
    pub kind: ReportKind,
    pub csv: Option<PathBuf>,
    /// Discard any saved progress before replaying.
    pub fresh: bool,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub summary: ReplaySummary,
    pub report: EstimateReport,
    pub notices: Vec<ExportNotice>,
}

/// Replays a scenario file, then builds the report and runs the exports.
pub async fn run_scenario(
    cache: Arc<dyn FormCache>,
    request: &RunRequest,
    report_config: &ReportConfig,
) -> Result<RunOutcome> {
    let file = std::fs::File::open(&request.scenario)
        .with_context(|| format!("cannot open scenario '{}'", request.scenario.display()))?;
    let scenario = ScenarioLoader::load(std::io::BufReader::new(file))
        .with_context(|| format!("cannot load scenario '{}'", request.scenario.display()))?;

    let mut session = WizardSession::mount(cache).await;
    if request.fresh {
        session.reset().await;
    }
    let summary = scenario.replay(&mut session).await.context("scenario replay failed")?;
    let snapshot = session.finish().await?;

    let report = EstimateReport::build(request.kind, &snapshot, report_config);
    let notices = export(&snapshot, request, report_config).await;
    info!(kind = %request.kind, total = %report.total_including_vat, "report ready");

    Ok(RunOutcome {
        summary,
        report,
        notices,
    })
}

async fn export(
    snapshot: &ReportSnapshot,
    request: &RunRequest,
    report_config: &ReportConfig,
) -> Vec<ExportNotice> {
    let Some(csv) = &request.csv else {
        return Vec::new();
    };
    let path = if csv.is_dir() {
        default_csv_path(csv, snapshot)
    } else {
        csv.clone()
    };
    let exporters: Vec<Box<dyn Exporter>> = vec![Box::new(CsvBreakdownExporter::new(path))];
    let options = ExportOptions {
        report: report_config.clone(),
        ..ExportOptions::new(request.kind)
    };
    dispatch_exports(&exporters, snapshot, &options).await
}

/// Describes the estimation saved in `cache`, without changing it.
pub async fn describe_saved(cache: &dyn FormCache) -> Result<String> {
    let Some(payload) = cache
        .get(FORM_DATA_KEY)
        .await
        .context("cannot read saved estimation")?
    else {
        return Ok("No estimation in progress.".to_string());
    };
    let state: FormState =
        serde_json::from_str(&payload).context("saved estimation is unreadable")?;
    let saved = cache
        .saved_form(FORM_DATA_KEY)
        .await
        .context("cannot read saved estimation")?;

    Ok(render_state(&state, saved.as_ref()))
}

fn render_state(
    state: &FormState,
    saved: Option<&SavedForm>,
) -> String {
    let mut text = format!(
        "Step {} of {}: {}\nRevision: {}\nRunning total: {}\n",
        state.step.id(),
        estimate_core::Step::MAX_ID,
        state.step.title(),
        state.version,
        estimate_core::report::format_euros(state.running_total()),
    );
    if let Some(saved) = saved {
        text.push_str(&format!(
            "Last saved: {} (total {})\n",
            saved.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            opt_euros_display(saved.running_total)
        ));
    }

    if !state.answers.is_empty() {
        text.push_str("\nAnswers\n");
        for (key, value) in state.answers.iter().filter(|(key, _)| *key != keys::RUNNING_TOTAL) {
            text.push_str(&format!("  {:<28} {}\n", field_label(key), value));
        }
    }
    if !state.ledger.is_empty() {
        text.push_str("\nPriced steps\n");
        for entry in state.ledger.entries() {
            text.push_str(&format!(
                "  {:<28} {:>16}\n",
                entry.step.title(),
                estimate_core::report::format_euros(entry.delta())
            ));
        }
    }
    text
}

/// Forgets the saved estimation.
pub async fn reset(cache: &dyn FormCache) -> Result<()> {
    cache
        .clear(FORM_DATA_KEY)
        .await
        .context("cannot clear saved estimation")?;
    info!("saved estimation cleared");
    Ok(())
}

/// CSV name used when `--csv` names a directory, stamped with the report time.
pub fn default_csv_path(
    dir: &Path,
    snapshot: &ReportSnapshot,
) -> PathBuf {
    dir.join(format!(
        "estimation-{}.csv",
        snapshot.taken_at.format("%Y%m%d-%H%M%S")
    ))
}
