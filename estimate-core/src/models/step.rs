//! The closed catalogue of wizard steps and the fields each one collects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::keys;

/// One screen of the wizard.
///
/// Steps are addressed by a stable numeric id (`1..=MAX_ID`). The terminal
/// thank-you step is serialized as the sentinel string `"thank-you"` instead
/// of its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "StepKey", into = "StepKey")]
pub enum Step {
    ClientType,
    ProfessionalProject,
    IndividualProject,
    EstimationType,
    FeatureChecklist,
    Terrain,
    Demolition,
    Masonry,
    Roofing,
    Windows,
    Insulation,
    Electrical,
    Plumbing,
    Heating,
    Finishes,
    EcoSolutions,
    RenewableEnergy,
    Landscaping,
    Options,
    Kitchen,
    Bathroom,
    Contact,
    ThankYou,
}

impl Step {
    pub const FIRST: Step = Step::ClientType;
    pub const LAST: Step = Step::ThankYou;
    pub const MAX_ID: u8 = 23;
    pub const THANK_YOU_KEY: &'static str = "thank-you";

    pub const ALL: [Step; 23] = [
        Step::ClientType,
        Step::ProfessionalProject,
        Step::IndividualProject,
        Step::EstimationType,
        Step::FeatureChecklist,
        Step::Terrain,
        Step::Demolition,
        Step::Masonry,
        Step::Roofing,
        Step::Windows,
        Step::Insulation,
        Step::Electrical,
        Step::Plumbing,
        Step::Heating,
        Step::Finishes,
        Step::EcoSolutions,
        Step::RenewableEnergy,
        Step::Landscaping,
        Step::Options,
        Step::Kitchen,
        Step::Bathroom,
        Step::Contact,
        Step::ThankYou,
    ];

    pub fn id(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }

    /// Maps any integer onto the step graph, clamping to `[1, MAX_ID]`.
    pub fn from_id_clamped(id: i64) -> Self {
        let clamped = id.clamp(1, i64::from(Self::MAX_ID));
        // The clamp keeps the value inside the table.
        Self::ALL[(clamped - 1) as usize]
    }

    /// The step with the next id, or `None` past the terminal step.
    pub fn successor(&self) -> Option<Self> {
        Self::from_id(self.id() + 1)
    }

    /// The step with the previous id, or `None` before the first step.
    pub fn predecessor(&self) -> Option<Self> {
        Self::from_id(self.id() - 1)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::LAST
    }

    /// Trade steps carry a priced selection.
    pub fn is_trade(&self) -> bool {
        (Self::Terrain..=Self::Bathroom).contains(self)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ClientType => "Client type",
            Self::ProfessionalProject => "Professional project",
            Self::IndividualProject => "Individual project",
            Self::EstimationType => "Estimation type",
            Self::FeatureChecklist => "Feature checklist",
            Self::Terrain => "Terrain preparation",
            Self::Demolition => "Demolition",
            Self::Masonry => "Masonry",
            Self::Roofing => "Roofing",
            Self::Windows => "Windows and doors",
            Self::Insulation => "Insulation",
            Self::Electrical => "Electrical",
            Self::Plumbing => "Plumbing",
            Self::Heating => "Heating",
            Self::Finishes => "Finishes",
            Self::EcoSolutions => "Eco solutions",
            Self::RenewableEnergy => "Renewable energy",
            Self::Landscaping => "Landscaping",
            Self::Options => "Options",
            Self::Kitchen => "Kitchen",
            Self::Bathroom => "Bathroom",
            Self::Contact => "Contact details",
            Self::ThankYou => "Thank you",
        }
    }

    /// The fields this step collects, in display order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        use FieldKind::{Choice, Choices, Flag, Number, Text};

        match self {
            Self::ClientType => const { &[FieldSpec::required(keys::CLIENT_TYPE, Choice)] },
            Self::ProfessionalProject => const {
                &[
                    FieldSpec::required(keys::PROJECT_TYPE, Choice),
                    FieldSpec::optional(keys::COMPANY_NAME, Text),
                ]
            },
            Self::IndividualProject => const { &[FieldSpec::required(keys::PROJECT_TYPE, Choice)] },
            Self::EstimationType => const {
                &[
                    FieldSpec::required(keys::ESTIMATION_TYPE, Choice),
                    FieldSpec::optional(keys::INCLUDE_ECO_SOLUTIONS, Flag),
                    FieldSpec::optional(keys::INCLUDE_RENEWABLE_ENERGY, Flag),
                    FieldSpec::optional(keys::INCLUDE_LANDSCAPING, Flag),
                    FieldSpec::optional(keys::INCLUDE_OPTIONS, Flag),
                    FieldSpec::optional(keys::INCLUDE_KITCHEN, Flag),
                    FieldSpec::optional(keys::INCLUDE_BATHROOM, Flag),
                ]
            },
            Self::FeatureChecklist => const { &[FieldSpec::optional(keys::FEATURES, Choices)] },
            Self::Terrain => const {
                &[
                    FieldSpec::required(keys::TERRAIN_TYPE, Choice),
                    FieldSpec::optional(keys::TERRAIN_AREA, Number),
                ]
            },
            Self::Demolition => const {
                &[
                    FieldSpec::required(keys::DEMOLITION_TYPE, Choice),
                    FieldSpec::optional(keys::DEMOLITION_AREA, Number),
                ]
            },
            Self::Masonry => const {
                &[
                    FieldSpec::required(keys::MASONRY_TYPE, Choice),
                    FieldSpec::optional(keys::MASONRY_WALL_AREA, Number),
                ]
            },
            Self::Roofing => const {
                &[
                    FieldSpec::required(keys::ROOFING_TYPE, Choice),
                    FieldSpec::optional(keys::ROOFING_AREA, Number),
                ]
            },
            Self::Windows => const {
                &[
                    FieldSpec::required(keys::WINDOWS_TYPE, Choice),
                    FieldSpec::optional(keys::WINDOWS_COUNT, Number),
                ]
            },
            Self::Insulation => const {
                &[
                    FieldSpec::required(keys::INSULATION_TYPE, Choice),
                    FieldSpec::optional(keys::INSULATION_AREA, Number),
                ]
            },
            Self::Electrical => const {
                &[
                    FieldSpec::required(keys::ELECTRICAL_TYPE, Choice),
                    FieldSpec::optional(keys::ELECTRICAL_AREA, Number),
                ]
            },
            Self::Plumbing => const {
                &[
                    FieldSpec::required(keys::PLUMBING_TYPE, Choice),
                    FieldSpec::optional(keys::PLUMBING_POINTS, Number),
                ]
            },
            Self::Heating => const {
                &[
                    FieldSpec::required(keys::HEATING_TYPE, Choice),
                    FieldSpec::optional(keys::HEATING_AREA, Number),
                ]
            },
            Self::Finishes => const {
                &[
                    FieldSpec::required(keys::FINISHES_TYPE, Choice),
                    FieldSpec::optional(keys::FINISHES_AREA, Number),
                ]
            },
            Self::EcoSolutions => const {
                &[FieldSpec::required(keys::ECO_SOLUTIONS_TYPE, Choice)]
            },
            Self::RenewableEnergy => const {
                &[FieldSpec::required(keys::RENEWABLE_ENERGY_TYPE, Choice)]
            },
            Self::Landscaping => const {
                &[
                    FieldSpec::required(keys::LANDSCAPING_TYPE, Choice),
                    FieldSpec::optional(keys::LANDSCAPING_AREA, Number),
                ]
            },
            Self::Options => const { &[FieldSpec::optional(keys::OPTIONS_ITEMS, Choices)] },
            Self::Kitchen => const {
                &[
                    FieldSpec::required(keys::KITCHEN_TYPE, Choice),
                    FieldSpec::optional(keys::KITCHEN_COUNT, Number),
                ]
            },
            Self::Bathroom => const {
                &[
                    FieldSpec::required(keys::BATHROOM_TYPE, Choice),
                    FieldSpec::optional(keys::BATHROOM_COUNT, Number),
                ]
            },
            Self::Contact => const {
                &[
                    FieldSpec::required(keys::CONTACT_NAME, Text),
                    FieldSpec::required(keys::CONTACT_EMAIL, Text),
                    FieldSpec::optional(keys::CONTACT_PHONE, Text),
                ]
            },
            Self::ThankYou => const { &[] },
        }
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.key == key)
    }
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.title(), StepKey::from(*self))
    }
}

/// Wire form of a step: a number, or the terminal sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepKey {
    Index(i64),
    Sentinel(String),
}

impl From<Step> for StepKey {
    fn from(step: Step) -> Self {
        if step.is_terminal() {
            StepKey::Sentinel(Step::THANK_YOU_KEY.to_string())
        } else {
            StepKey::Index(i64::from(step.id()))
        }
    }
}

impl TryFrom<StepKey> for Step {
    type Error = String;

    fn try_from(key: StepKey) -> Result<Self, Self::Error> {
        match key {
            StepKey::Index(id) => Ok(Step::from_id_clamped(id)),
            StepKey::Sentinel(s) if s == Step::THANK_YOU_KEY => Ok(Step::ThankYou),
            StepKey::Sentinel(s) => Err(format!("unknown step key '{s}'")),
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            StepKey::Index(id) => write!(f, "{id}"),
            StepKey::Sentinel(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of a navigation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub step: Step,
    pub direction: Direction,
}

impl Transition {
    pub fn forward(step: Step) -> Self {
        Self {
            step,
            direction: Direction::Forward,
        }
    }

    pub fn backward(step: Step) -> Self {
        Self {
            step,
            direction: Direction::Backward,
        }
    }
}

/// How raw input for a field is coerced when it enters the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One value from a closed list, stored trimmed.
    Choice,
    /// Any number of values from a closed list.
    Choices,
    /// Numeric input; unparseable text becomes zero.
    Number,
    /// Checkbox-style input.
    Flag,
    /// Free text.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(
        key: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            kind,
            required: true,
        }
    }

    const fn optional(
        key: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            kind,
            required: false,
        }
    }
}
