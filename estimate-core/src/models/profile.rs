use serde::{Deserialize, Serialize};

use crate::models::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Individual,
    Professional,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Professional => "professional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Some(Self::Individual),
            "professional" => Some(Self::Professional),
            _ => None,
        }
    }

    /// The project-type screen shown to this kind of client.
    pub fn project_step(&self) -> Step {
        match self {
            Self::Individual => Step::IndividualProject,
            Self::Professional => Step::ProfessionalProject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Construction,
    Extension,
    Renovation,
    Division,
    Design,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Extension => "extension",
            Self::Renovation => "renovation",
            Self::Division => "division",
            Self::Design => "design",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "construction" => Some(Self::Construction),
            "extension" => Some(Self::Extension),
            "renovation" => Some(Self::Renovation),
            "division" => Some(Self::Division),
            "design" => Some(Self::Design),
            _ => None,
        }
    }

    /// Renovation and division work on an existing building: they get the
    /// demolition step, the eco/renewable prefix and the renovation roofing
    /// tariff.
    pub fn works_on_existing(&self) -> bool {
        matches!(self, Self::Renovation | Self::Division)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimationType {
    Quick,
    Precise,
}

impl EstimationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Precise => "precise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Some(Self::Quick),
            "precise" => Some(Self::Precise),
            _ => None,
        }
    }
}

/// Trades offered on the quick-estimation checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
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
}

impl Feature {
    pub const ALL: [Feature; 16] = [
        Feature::Terrain,
        Feature::Demolition,
        Feature::Masonry,
        Feature::Roofing,
        Feature::Windows,
        Feature::Insulation,
        Feature::Electrical,
        Feature::Plumbing,
        Feature::Heating,
        Feature::Finishes,
        Feature::EcoSolutions,
        Feature::RenewableEnergy,
        Feature::Landscaping,
        Feature::Options,
        Feature::Kitchen,
        Feature::Bathroom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terrain => "terrain",
            Self::Demolition => "demolition",
            Self::Masonry => "masonry",
            Self::Roofing => "roofing",
            Self::Windows => "windows",
            Self::Insulation => "insulation",
            Self::Electrical => "electrical",
            Self::Plumbing => "plumbing",
            Self::Heating => "heating",
            Self::Finishes => "finishes",
            Self::EcoSolutions => "ecoSolutions",
            Self::RenewableEnergy => "renewableEnergy",
            Self::Landscaping => "landscaping",
            Self::Options => "options",
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Fixed feature → step lookup used when leaving the checklist.
    pub fn step(&self) -> Step {
        match self {
            Self::Terrain => Step::Terrain,
            Self::Demolition => Step::Demolition,
            Self::Masonry => Step::Masonry,
            Self::Roofing => Step::Roofing,
            Self::Windows => Step::Windows,
            Self::Insulation => Step::Insulation,
            Self::Electrical => Step::Electrical,
            Self::Plumbing => Step::Plumbing,
            Self::Heating => Step::Heating,
            Self::Finishes => Step::Finishes,
            Self::EcoSolutions => Step::EcoSolutions,
            Self::RenewableEnergy => Step::RenewableEnergy,
            Self::Landscaping => Step::Landscaping,
            Self::Options => Step::Options,
            Self::Kitchen => Step::Kitchen,
            Self::Bathroom => Step::Bathroom,
        }
    }
}
