use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ClientType, EstimationType, Feature, ProjectType};

/// Field names of the answer set, namespaced by category.
pub mod keys {
    pub const CLIENT_TYPE: &str = "clientType";
    pub const COMPANY_NAME: &str = "companyName";
    pub const PROJECT_TYPE: &str = "projectType";
    pub const ESTIMATION_TYPE: &str = "estimationType";
    pub const FEATURES: &str = "features";

    pub const INCLUDE_ECO_SOLUTIONS: &str = "includeEcoSolutions";
    pub const INCLUDE_RENEWABLE_ENERGY: &str = "includeRenewableEnergy";
    pub const INCLUDE_LANDSCAPING: &str = "includeLandscaping";
    pub const INCLUDE_OPTIONS: &str = "includeOptions";
    pub const INCLUDE_KITCHEN: &str = "includeCuisine";
    pub const INCLUDE_BATHROOM: &str = "includeBathroom";

    pub const TERRAIN_TYPE: &str = "terrain.type";
    pub const TERRAIN_AREA: &str = "terrain.area";
    pub const DEMOLITION_TYPE: &str = "demolition.type";
    pub const DEMOLITION_AREA: &str = "demolition.area";
    pub const MASONRY_TYPE: &str = "masonry.type";
    pub const MASONRY_WALL_AREA: &str = "masonry.wallArea";
    pub const ROOFING_TYPE: &str = "roofing.type";
    pub const ROOFING_AREA: &str = "roofing.area";
    pub const WINDOWS_TYPE: &str = "windows.type";
    pub const WINDOWS_COUNT: &str = "windows.count";
    pub const INSULATION_TYPE: &str = "insulation.type";
    pub const INSULATION_AREA: &str = "insulation.area";
    pub const ELECTRICAL_TYPE: &str = "electrical.type";
    pub const ELECTRICAL_AREA: &str = "electrical.area";
    pub const PLUMBING_TYPE: &str = "plumbing.type";
    pub const PLUMBING_POINTS: &str = "plumbing.points";
    pub const HEATING_TYPE: &str = "heating.type";
    pub const HEATING_AREA: &str = "heating.area";
    pub const FINISHES_TYPE: &str = "finishes.type";
    pub const FINISHES_AREA: &str = "finishes.area";
    pub const ECO_SOLUTIONS_TYPE: &str = "ecoSolutions.type";
    pub const RENEWABLE_ENERGY_TYPE: &str = "renewableEnergy.type";
    pub const LANDSCAPING_TYPE: &str = "landscaping.type";
    pub const LANDSCAPING_AREA: &str = "landscaping.area";
    pub const OPTIONS_ITEMS: &str = "options.items";
    pub const KITCHEN_TYPE: &str = "kitchen.type";
    pub const KITCHEN_COUNT: &str = "kitchen.count";
    pub const BATHROOM_TYPE: &str = "bathroom.type";
    pub const BATHROOM_COUNT: &str = "bathroom.count";

    pub const CONTACT_NAME: &str = "contact.name";
    pub const CONTACT_EMAIL: &str = "contact.email";
    pub const CONTACT_PHONE: &str = "contact.phone";

    /// Running total, kept in the answer set for the report layer.
    pub const RUNNING_TOTAL: &str = "montantT";
}

/// A typed answer. Values are coerced once when they enter the core and are
/// never re-coerced afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Flag(bool),
    List(Vec<String>),
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n.normalize()),
            Self::Flag(true) => f.write_str("yes"),
            Self::Flag(false) => f.write_str("no"),
            Self::List(items) => f.write_str(&items.join("|")),
        }
    }
}

/// Immutable snapshot of every answer given so far.
///
/// Updates go through [`AnswerSet::with`], which returns a new snapshot and
/// leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    fields: BTreeMap<String, FieldValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        &self,
        key: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(key.into(), value);
        Self { fields }
    }

    pub fn with_all(
        &self,
        values: impl IntoIterator<Item = (String, FieldValue)>,
    ) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(values);
        Self { fields }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text of a field; blank text counts as absent.
    pub fn text(
        &self,
        key: &str,
    ) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric value of a field; anything else reads as zero.
    pub fn number(
        &self,
        key: &str,
    ) -> Decimal {
        match self.fields.get(key) {
            Some(FieldValue::Number(n)) => *n,
            _ => Decimal::ZERO,
        }
    }

    /// Flag value of a field; missing or non-flag values read as `false`.
    pub fn flag(
        &self,
        key: &str,
    ) -> bool {
        matches!(self.fields.get(key), Some(FieldValue::Flag(true)))
    }

    pub fn list(
        &self,
        key: &str,
    ) -> &[String] {
        match self.fields.get(key) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn client_type(&self) -> Option<ClientType> {
        self.text(keys::CLIENT_TYPE).and_then(ClientType::parse)
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        self.text(keys::PROJECT_TYPE).and_then(ProjectType::parse)
    }

    pub fn estimation_type(&self) -> Option<EstimationType> {
        self.text(keys::ESTIMATION_TYPE).and_then(EstimationType::parse)
    }

    /// Checked features in the order the user ticked them. Unknown names are
    /// dropped.
    pub fn features(&self) -> Vec<Feature> {
        self.list(keys::FEATURES)
            .iter()
            .filter_map(|name| Feature::parse(name))
            .collect()
    }

    pub fn running_total(&self) -> Decimal {
        self.number(keys::RUNNING_TOTAL)
    }
}
