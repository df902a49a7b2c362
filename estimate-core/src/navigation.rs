//! Step graph navigation.
//!
//! Decides which step follows (or precedes) the current one given the
//! answers collected so far. Navigation is pure and total: missing or
//! malformed answers read as absent/`false`, and every call returns a step
//! inside `[Step::FIRST, Step::LAST]`.
//!
//! # Rules
//!
//! | Rule | Effect |
//! |------|--------|
//! | Client type | Individuals skip the professional project step, professionals skip the individual one |
//! | Design project | `next` from any step before contact goes straight to contact |
//! | Quick estimation | Estimation type → feature checklist → first checked feature's step → contact |
//! | Skip chain | Optional steps are skipped while their `includeX` flag is false |
//! | Existing building | Demolition, eco solutions and renewable energy only for renovation/division |
//! | Clamping | Nothing before the first step, nothing after thank-you |
//!
//! # Example
//!
//! ```
//! use estimate_core::models::{AnswerSet, FieldValue, Step, keys};
//! use estimate_core::navigation::next_step;
//!
//! let answers = AnswerSet::new()
//!     .with(keys::CLIENT_TYPE, FieldValue::Text("individual".into()));
//!
//! assert_eq!(next_step(Step::ClientType, &answers).step, Step::IndividualProject);
//! ```

use tracing::debug;

use crate::models::{
    AnswerSet, ClientType, EstimationType, Feature, ProjectType, Step, Transition, keys,
};

/// Inclusion flags for the optional trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Inclusions {
    eco_solutions: bool,
    renewable_energy: bool,
    landscaping: bool,
    options: bool,
    kitchen: bool,
    bathroom: bool,
}

/// The navigation-relevant view of an answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    client: Option<ClientType>,
    project: Option<ProjectType>,
    estimation: Option<EstimationType>,
    first_feature: Option<Feature>,
    include: Inclusions,
}

impl StepNavigator {
    pub fn new(answers: &AnswerSet) -> Self {
        Self {
            client: answers.client_type(),
            project: answers.project_type(),
            estimation: answers.estimation_type(),
            first_feature: answers.features().first().copied(),
            include: Inclusions {
                eco_solutions: answers.flag(keys::INCLUDE_ECO_SOLUTIONS),
                renewable_energy: answers.flag(keys::INCLUDE_RENEWABLE_ENERGY),
                landscaping: answers.flag(keys::INCLUDE_LANDSCAPING),
                options: answers.flag(keys::INCLUDE_OPTIONS),
                kitchen: answers.flag(keys::INCLUDE_KITCHEN),
                bathroom: answers.flag(keys::INCLUDE_BATHROOM),
            },
        }
    }

    /// The step shown after `current`.
    pub fn next(
        &self,
        current: Step,
    ) -> Transition {
        let target = if self.is_design() && current < Step::Contact {
            Step::Contact
        } else if current == Step::FeatureChecklist {
            self.checklist_target()
        } else if current == Step::EstimationType && self.is_quick() {
            Step::FeatureChecklist
        } else if self.is_quick() && current.is_trade() {
            Step::Contact
        } else {
            self.walk_forward(current)
        };

        let target = if target == Step::Demolition && !self.works_on_existing() {
            self.past_demolition()
        } else {
            target
        };

        debug!(from = %current, to = %target, "next step");
        Transition::forward(target)
    }

    /// The step shown before `current`.
    pub fn previous(
        &self,
        current: Step,
    ) -> Transition {
        let target = if self.is_design() && current == Step::Contact {
            self.client
                .map_or(Step::IndividualProject, |c| c.project_step())
        } else if current == Step::FeatureChecklist {
            Step::EstimationType
        } else if self.is_quick() && current.is_trade() {
            Step::FeatureChecklist
        } else if self.is_quick() && current == Step::Contact {
            self.first_feature
                .map_or(Step::FeatureChecklist, |f| f.step())
        } else {
            self.walk_backward(current)
        };

        let target = if target == Step::Demolition && !self.works_on_existing() {
            if self.is_quick() {
                Step::FeatureChecklist
            } else {
                self.walk_backward(Step::Demolition)
            }
        } else {
            target
        };

        debug!(from = %current, to = %target, "previous step");
        Transition::backward(target)
    }

    fn is_design(&self) -> bool {
        self.project == Some(ProjectType::Design)
    }

    fn is_quick(&self) -> bool {
        self.estimation == Some(EstimationType::Quick)
    }

    /// Missing project type behaves like construction.
    fn works_on_existing(&self) -> bool {
        self.project.is_some_and(|p| p.works_on_existing())
    }

    /// Leaving the checklist only follows the first checked feature.
    fn checklist_target(&self) -> Step {
        self.first_feature.map_or(Step::Contact, |f| f.step())
    }

    fn past_demolition(&self) -> Step {
        if self.is_quick() {
            Step::Contact
        } else {
            self.walk_forward(Step::Demolition)
        }
    }

    /// Whether the sequential walk stops on `step`.
    fn is_visible(
        &self,
        step: Step,
    ) -> bool {
        match step {
            Step::ProfessionalProject => self.client != Some(ClientType::Individual),
            Step::IndividualProject => self.client != Some(ClientType::Professional),
            // Only reachable through the quick-estimation branch.
            Step::FeatureChecklist => false,
            Step::Demolition => self.works_on_existing(),
            Step::EcoSolutions => self.works_on_existing() && self.include.eco_solutions,
            Step::RenewableEnergy => self.works_on_existing() && self.include.renewable_energy,
            Step::Landscaping => self.include.landscaping,
            Step::Options => self.include.options,
            Step::Kitchen => self.include.kitchen,
            Step::Bathroom => self.include.bathroom,
            Step::ClientType
            | Step::EstimationType
            | Step::Terrain
            | Step::Masonry
            | Step::Roofing
            | Step::Windows
            | Step::Insulation
            | Step::Electrical
            | Step::Plumbing
            | Step::Heating
            | Step::Finishes
            | Step::Contact
            | Step::ThankYou => true,
        }
    }

    fn walk_forward(
        &self,
        from: Step,
    ) -> Step {
        let mut candidate = from;
        while let Some(next) = candidate.successor() {
            candidate = next;
            if self.is_visible(candidate) {
                return candidate;
            }
        }
        from
    }

    fn walk_backward(
        &self,
        from: Step,
    ) -> Step {
        let mut candidate = from;
        while let Some(previous) = candidate.predecessor() {
            candidate = previous;
            if self.is_visible(candidate) {
                return candidate;
            }
        }
        from
    }
}

/// The step after `current` for the given answers.
pub fn next_step(
    current: Step,
    answers: &AnswerSet,
) -> Transition {
    StepNavigator::new(answers).next(current)
}

/// The step before `current` for the given answers.
pub fn previous_step(
    current: Step,
    answers: &AnswerSet,
) -> Transition {
    StepNavigator::new(answers).previous(current)
}

/// Every step the current answers lead through, from the first step to
/// thank-you.
pub fn forward_route(answers: &AnswerSet) -> Vec<Step> {
    let navigator = StepNavigator::new(answers);
    let mut route = vec![Step::FIRST];
    let mut current = Step::FIRST;
    while !current.is_terminal() && route.len() < Step::ALL.len() {
        current = navigator.next(current).step;
        route.push(current);
    }
    route
}
