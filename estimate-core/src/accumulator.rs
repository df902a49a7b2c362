//! Running-total accumulation.
//!
//! Each step prices its own selections into cost lines. The ledger keeps
//! those lines keyed by step: revisiting a step replaces its entry instead of
//! adding a second delta, and the running total is always the fold of the
//! entries currently in the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AnswerSet, Step, keys};
use crate::pricing::common::non_negative;
use crate::pricing::{
    BathroomTier, CostLine, DemolitionKind, EcoSolution, ElectricalGrade, FinishGrade,
    HeatingSystem, HomeOption, InsulationMaterial, KitchenTier, LandscapingWork, MasonryMaterial,
    PlumbingGrade, Quantity, RenewableSource, RoofingMaterial, RoofingRenovMaterial, Tariff,
    TerrainKind, WindowFrame, share_line, unit_line,
};

/// Adds a category delta to the running total. Negative deltas are ignored,
/// so the total never decreases through a fold. Saturates at `Decimal::MAX`.
pub fn fold(
    running_total: Decimal,
    delta: Decimal,
) -> Decimal {
    running_total.saturating_add(non_negative(delta))
}

fn priced<T: Tariff>(
    answers: &AnswerSet,
    selection_key: &str,
    quantity_key: &str,
) -> Vec<CostLine> {
    answers
        .text(selection_key)
        .map(|selection| unit_line::<T>(selection, Quantity::new(answers.number(quantity_key))))
        .into_iter()
        .collect()
}

fn shared<T: Tariff>(
    answers: &AnswerSet,
    selection_key: &str,
    running_total: Decimal,
) -> Vec<CostLine> {
    answers
        .text(selection_key)
        .map(|selection| share_line::<T>(selection, running_total))
        .into_iter()
        .collect()
}

/// Prices the selections collected by `step`.
///
/// `running_total` is the total of the steps before this one; only the
/// percentage categories read it.
pub fn step_cost(
    step: Step,
    answers: &AnswerSet,
    running_total: Decimal,
) -> Vec<CostLine> {
    match step {
        Step::ClientType
        | Step::ProfessionalProject
        | Step::IndividualProject
        | Step::EstimationType
        | Step::FeatureChecklist
        | Step::Contact
        | Step::ThankYou => Vec::new(),
        Step::Terrain => priced::<TerrainKind>(answers, keys::TERRAIN_TYPE, keys::TERRAIN_AREA),
        Step::Demolition => {
            priced::<DemolitionKind>(answers, keys::DEMOLITION_TYPE, keys::DEMOLITION_AREA)
        }
        Step::Masonry => {
            priced::<MasonryMaterial>(answers, keys::MASONRY_TYPE, keys::MASONRY_WALL_AREA)
        }
        Step::Roofing => {
            if answers.project_type().is_some_and(|p| p.works_on_existing()) {
                priced::<RoofingRenovMaterial>(answers, keys::ROOFING_TYPE, keys::ROOFING_AREA)
            } else {
                priced::<RoofingMaterial>(answers, keys::ROOFING_TYPE, keys::ROOFING_AREA)
            }
        }
        Step::Windows => priced::<WindowFrame>(answers, keys::WINDOWS_TYPE, keys::WINDOWS_COUNT),
        Step::Insulation => {
            priced::<InsulationMaterial>(answers, keys::INSULATION_TYPE, keys::INSULATION_AREA)
        }
        Step::Electrical => {
            priced::<ElectricalGrade>(answers, keys::ELECTRICAL_TYPE, keys::ELECTRICAL_AREA)
        }
        Step::Plumbing => {
            priced::<PlumbingGrade>(answers, keys::PLUMBING_TYPE, keys::PLUMBING_POINTS)
        }
        Step::Heating => priced::<HeatingSystem>(answers, keys::HEATING_TYPE, keys::HEATING_AREA),
        Step::Finishes => priced::<FinishGrade>(answers, keys::FINISHES_TYPE, keys::FINISHES_AREA),
        Step::EcoSolutions => {
            shared::<EcoSolution>(answers, keys::ECO_SOLUTIONS_TYPE, running_total)
        }
        Step::RenewableEnergy => {
            shared::<RenewableSource>(answers, keys::RENEWABLE_ENERGY_TYPE, running_total)
        }
        Step::Landscaping => {
            priced::<LandscapingWork>(answers, keys::LANDSCAPING_TYPE, keys::LANDSCAPING_AREA)
        }
        Step::Options => answers
            .list(keys::OPTIONS_ITEMS)
            .iter()
            .map(|item| unit_line::<HomeOption>(item, Quantity::from(1)))
            .collect(),
        Step::Kitchen => priced::<KitchenTier>(answers, keys::KITCHEN_TYPE, keys::KITCHEN_COUNT),
        Step::Bathroom => {
            priced::<BathroomTier>(answers, keys::BATHROOM_TYPE, keys::BATHROOM_COUNT)
        }
    }
}

/// Cost lines produced by one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCost {
    pub step: Step,
    pub lines: Vec<CostLine>,
}

impl StepCost {
    pub fn delta(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |total, line| fold(total, line.amount))
    }
}

/// Per-step cost entries, ordered by step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLedger {
    entries: Vec<StepCost>,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lines for `step`, replacing any earlier entry. Steps without
    /// lines are removed. Returns the step's delta.
    pub fn replace(
        &mut self,
        step: Step,
        lines: Vec<CostLine>,
    ) -> Decimal {
        self.entries.retain(|entry| entry.step != step);
        if lines.is_empty() {
            return Decimal::ZERO;
        }

        let entry = StepCost { step, lines };
        let delta = entry.delta();
        let position = self
            .entries
            .partition_point(|existing| existing.step < step);
        self.entries.insert(position, entry);
        delta
    }

    /// Drops entries for steps the current route no longer visits.
    pub fn retain_steps(
        &mut self,
        route: &[Step],
    ) -> Vec<Step> {
        let mut dropped = Vec::new();
        self.entries.retain(|entry| {
            let keep = route.contains(&entry.step);
            if !keep {
                dropped.push(entry.step);
            }
            keep
        });
        dropped
    }

    pub fn entry(
        &self,
        step: Step,
    ) -> Option<&StepCost> {
        self.entries.iter().find(|entry| entry.step == step)
    }

    pub fn entries(&self) -> &[StepCost] {
        &self.entries
    }

    pub fn lines(&self) -> impl Iterator<Item = &CostLine> {
        self.entries.iter().flat_map(|entry| entry.lines.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The running total.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |total, entry| fold(total, entry.delta()))
    }

    /// The total of every step before `step`: the base a percentage
    /// category at `step` is priced against.
    pub fn total_before(
        &self,
        step: Step,
    ) -> Decimal {
        self.entries
            .iter()
            .take_while(|entry| entry.step < step)
            .fold(Decimal::ZERO, |total, entry| fold(total, entry.delta()))
    }

    /// Reprices the percentage entries against their current base. Run after
    /// any entry before them changed.
    pub fn reprice_shares(
        &mut self,
        answers: &AnswerSet,
    ) {
        for step in [Step::EcoSolutions, Step::RenewableEnergy] {
            if self.entry(step).is_some() {
                let base = self.total_before(step);
                self.replace(step, step_cost(step, answers, base));
            }
        }
    }
}
