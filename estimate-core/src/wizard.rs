//! The wizard controller.
//!
//! [`Wizard`] owns the only mutable handle on the form. Each user action
//! builds a new [`FormState`] from the previous one and swaps it in, so a
//! snapshot handed out earlier never changes under its holder.

use std::sync::Arc;

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::accumulator::{CostLedger, step_cost};
use crate::coerce::{RawInput, coerce_field};
use crate::models::{AnswerSet, FieldValue, Step, Transition, keys};
use crate::navigation::{forward_route, next_step, previous_step};
use crate::report::ReportSnapshot;
use crate::validation::{FieldError, validate_step};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("cannot advance: {}", join_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("the estimation is already complete")]
    Finished,

    #[error("the estimation is not complete (current step: {step})")]
    Incomplete { step: Step },
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Everything the wizard knows at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub version: u64,
    pub step: Step,
    pub answers: AnswerSet,
    #[serde(default)]
    pub ledger: CostLedger,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            version: 0,
            step: Step::FIRST,
            answers: AnswerSet::new(),
            ledger: CostLedger::new(),
        }
    }

    pub fn running_total(&self) -> Decimal {
        self.ledger.total()
    }

    pub fn is_finished(&self) -> bool {
        self.step.is_terminal()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub completed: Step,
    pub transition: Transition,
    pub delta: Decimal,
    pub running_total: Decimal,
    /// Steps whose costs were dropped because the new answers no longer
    /// route through them.
    pub dropped: Vec<Step>,
}

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    current: Arc<FormState>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a stored state.
    pub fn from_state(state: FormState) -> Self {
        Self {
            current: Arc::new(state),
        }
    }

    /// The current state. Later actions do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<FormState> {
        Arc::clone(&self.current)
    }

    pub fn step(&self) -> Step {
        self.current.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.current.answers
    }

    pub fn running_total(&self) -> Decimal {
        self.current.running_total()
    }

    pub fn version(&self) -> u64 {
        self.current.version
    }

    /// Records the current step's inputs and advances.
    ///
    /// Inputs are coerced against the step's field schema; keys the step
    /// does not collect are ignored. When validation fails nothing changes
    /// and the navigator is not consulted.
    ///
    /// # Errors
    /// * [`WizardError::Finished`] when already on the thank-you step.
    /// * [`WizardError::Validation`] when a required field is missing or
    ///   malformed.
    pub fn submit<I, K, V>(
        &mut self,
        inputs: I,
    ) -> Result<StepOutcome, WizardError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawInput>,
    {
        let state = &self.current;
        let step = state.step;
        if step.is_terminal() {
            return Err(WizardError::Finished);
        }

        let values: Vec<(String, FieldValue)> = inputs
            .into_iter()
            .filter_map(|(key, raw)| {
                let key = key.as_ref();
                match step.field(key) {
                    Some(field) => Some((field.key.to_string(), coerce_field(field, &raw.into()))),
                    None => {
                        debug!(%step, field = key, "ignoring input the step does not collect");
                        None
                    }
                }
            })
            .collect();

        let answers = state.answers.with_all(values);
        let errors = validate_step(step, &answers);
        if !errors.is_empty() {
            debug!(%step, errors = errors.len(), "step refused");
            return Err(WizardError::Validation(errors));
        }

        let mut ledger = state.ledger.clone();
        let lines = step_cost(step, &answers, ledger.total_before(step));
        let delta = ledger.replace(step, lines);

        let transition = next_step(step, &answers);
        let dropped = ledger.retain_steps(&forward_route(&answers));
        if !dropped.is_empty() {
            debug!(?dropped, "dropped costs for steps off the route");
        }
        ledger.reprice_shares(&answers);

        let running_total = ledger.total();
        let answers = answers.with(keys::RUNNING_TOTAL, FieldValue::Number(running_total));

        info!(
            completed = %step,
            next = %transition.step,
            %delta,
            %running_total,
            "step completed"
        );

        self.current = Arc::new(FormState {
            version: state.version + 1,
            step: transition.step,
            answers,
            ledger,
        });

        Ok(StepOutcome {
            completed: step,
            transition,
            delta,
            running_total,
            dropped,
        })
    }

    /// Moves to the previous step. Answers and costs are kept so a revisit
    /// replaces them.
    pub fn back(&mut self) -> Transition {
        let state = &self.current;
        let transition = previous_step(state.step, &state.answers);
        if transition.step != state.step {
            debug!(from = %state.step, to = %transition.step, "moved back");
            self.current = Arc::new(FormState {
                version: state.version + 1,
                step: transition.step,
                answers: state.answers.clone(),
                ledger: state.ledger.clone(),
            });
        }
        transition
    }

    /// Starts over with an empty form.
    pub fn reset(&mut self) {
        let version = self.current.version + 1;
        self.current = Arc::new(FormState {
            version,
            ..FormState::new()
        });
        info!("estimation reset");
    }

    /// The read-only snapshot handed to the report layer.
    ///
    /// # Errors
    /// [`WizardError::Incomplete`] unless the thank-you step was reached.
    pub fn report_snapshot(&self) -> Result<ReportSnapshot, WizardError> {
        if !self.current.is_finished() {
            return Err(WizardError::Incomplete {
                step: self.current.step,
            });
        }
        Ok(ReportSnapshot::from_state(&self.current, Local::now().naive_local()))
    }
}
