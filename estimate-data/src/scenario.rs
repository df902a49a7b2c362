use std::collections::BTreeMap;
use std::io::Read;

use estimate_core::{RawInput, Step, WizardError, WizardSession};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown step '{0}' (use a step number or its title)")]
    UnknownStep(String),

    #[error("Step {step} was refused: {source}")]
    Refused {
        step: Step,
        #[source]
        source: WizardError,
    },

    #[error("Replay did not reach the thank-you step after {0} submissions")]
    Runaway(usize),
}

impl From<csv::Error> for ScenarioError {
    fn from(err: csv::Error) -> Self {
        ScenarioError::CsvParse(err.to_string())
    }
}

/// A single record from a scenario CSV file.
///
/// - `step`: step number (`1`..`23`) or step title, case-insensitive
/// - `field`: answer key, e.g. `roofing.type`
/// - `value`: raw input as typed; multi-select values are separated by `|`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScenarioRecord {
    pub step: String,
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Resolves the `step` column of a scenario record.
fn parse_step(s: &str) -> Result<Step, ScenarioError> {
    let wanted = s.trim();
    let by_id = wanted
        .parse::<u8>()
        .ok()
        .and_then(Step::from_id);
    let by_title = || {
        Step::ALL
            .iter()
            .copied()
            .find(|step| step.title().eq_ignore_ascii_case(wanted))
    };

    by_id
        .or_else(by_title)
        .ok_or_else(|| ScenarioError::UnknownStep(wanted.to_string()))
}

/// Scripted answers, grouped by the step that collects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    inputs: BTreeMap<Step, Vec<(String, RawInput)>>,
}

/// What a replay went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub visited: Vec<Step>,
    pub running_total: Decimal,
}

impl Scenario {
    pub fn from_records(records: &[ScenarioRecord]) -> Result<Self, ScenarioError> {
        let mut inputs: BTreeMap<Step, Vec<(String, RawInput)>> = BTreeMap::new();
        for record in records {
            let step = parse_step(&record.step)?;
            inputs
                .entry(step)
                .or_default()
                .push((record.field.trim().to_string(), RawInput::from(record.value.as_str())));
        }
        Ok(Self { inputs })
    }

    /// Inputs scripted for `step`; empty when the scenario has none.
    pub fn inputs_for(
        &self,
        step: Step,
    ) -> &[(String, RawInput)] {
        self.inputs.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.inputs.keys().copied()
    }

    /// Submits each current step's inputs until the thank-you step.
    ///
    /// Steps the scenario has no inputs for are submitted empty, which only
    /// passes when they have no required field.
    ///
    /// # Errors
    /// * [`ScenarioError::Refused`] when a step fails validation.
    /// * [`ScenarioError::Runaway`] when the wizard does not finish.
    pub async fn replay(
        &self,
        session: &mut WizardSession,
    ) -> Result<ReplaySummary, ScenarioError> {
        let limit = Step::ALL.len();
        let mut visited = Vec::new();

        while !session.wizard().step().is_terminal() {
            if visited.len() >= limit {
                return Err(ScenarioError::Runaway(visited.len()));
            }

            let step = session.wizard().step();
            let inputs = self.inputs_for(step).to_vec();
            debug!(%step, inputs = inputs.len(), "replaying step");
            session
                .submit(inputs)
                .await
                .map_err(|source| ScenarioError::Refused { step, source })?;
            visited.push(step);
        }

        let running_total = session.wizard().running_total();
        info!(steps = visited.len(), %running_total, "scenario replayed");
        Ok(ReplaySummary {
            visited,
            running_total,
        })
    }
}

/// Loader for scenario CSV files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse scenario records from a CSV reader. Lines starting with `#` are
    /// comments.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioRecord>, ScenarioError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScenarioRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and group a scenario in one go.
    pub fn load<R: Read>(reader: R) -> Result<Scenario, ScenarioError> {
        let records = Self::parse(reader)?;
        Scenario::from_records(&records)
    }
}
