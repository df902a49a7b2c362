//! The single boundary where raw form input becomes typed answers.
//!
//! Raw input is always textual (or a list of texts for multi-select widgets).
//! Every field is coerced here, exactly once, according to the
//! [`FieldKind`] its step declares. Coercion never fails: unparseable
//! numbers become zero and unrecognised booleans become `false`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{FieldKind, FieldSpec, FieldValue};

/// Input exactly as a form widget reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInput {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        RawInput::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        RawInput::Text(s)
    }
}

impl From<bool> for RawInput {
    fn from(checked: bool) -> Self {
        RawInput::Text(checked.to_string())
    }
}

impl From<Vec<String>> for RawInput {
    fn from(items: Vec<String>) -> Self {
        RawInput::List(items)
    }
}

impl From<&[&str]> for RawInput {
    fn from(items: &[&str]) -> Self {
        RawInput::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Normalizes user-typed numbers: strips whitespace (including the
/// non-breaking spaces used as French thousands separators) and currency
/// signs, then settles the meaning of commas.
///
/// - `"1,234.56"`: comma is a thousands separator.
/// - `"12,5"`: a single comma is the decimal separator.
/// - `"1,234,567"`: several commas are thousands separators.
fn normalize_number_input(s: &str) -> String {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\u{a0}' | '\u{202f}' | '€' | '_'))
        .collect();

    let commas = compact.matches(',').count();
    if compact.contains('.') || commas > 1 {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    }
}

/// Converts textual input to a number. Empty or unparseable input is zero.
pub fn coerce_number(s: &str) -> Decimal {
    let normalized = normalize_number_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|e| {
            debug!(input = %s, "unparseable number coerced to zero: {}", e);
            Decimal::ZERO
        })
}

/// Converts checkbox-style input to a flag. Anything unrecognised is `false`.
pub fn coerce_boolean(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes" | "oui" | "checked"
    )
}

fn split_list(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerces one raw input according to the field's declared kind.
pub fn coerce_field(
    field: &FieldSpec,
    raw: &RawInput,
) -> FieldValue {
    match (field.kind, raw) {
        (FieldKind::Number, RawInput::Text(s)) => FieldValue::Number(coerce_number(s)),
        (FieldKind::Number, RawInput::List(items)) => {
            FieldValue::Number(items.first().map_or(Decimal::ZERO, |s| coerce_number(s)))
        }
        (FieldKind::Flag, RawInput::Text(s)) => FieldValue::Flag(coerce_boolean(s)),
        (FieldKind::Flag, RawInput::List(items)) => {
            FieldValue::Flag(items.iter().any(|s| coerce_boolean(s)))
        }
        (FieldKind::Choice | FieldKind::Text, RawInput::Text(s)) => {
            FieldValue::Text(s.trim().to_string())
        }
        (FieldKind::Choice | FieldKind::Text, RawInput::List(items)) => FieldValue::Text(
            items
                .first()
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        ),
        (FieldKind::Choices, RawInput::Text(s)) => FieldValue::List(split_list(s)),
        (FieldKind::Choices, RawInput::List(items)) => FieldValue::List(
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Step, keys};

    #[test]
    fn coerce_number_parses_plain_values() {
        assert_eq!(coerce_number("100"), dec!(100));
        assert_eq!(coerce_number("  42.5 "), dec!(42.5));
        assert_eq!(coerce_number("-3"), dec!(-3));
    }

    #[test]
    fn coerce_number_accepts_decimal_comma() {
        assert_eq!(coerce_number("12,5"), dec!(12.5));
    }

    #[test]
    fn coerce_number_accepts_thousands_separators() {
        assert_eq!(coerce_number("1,234.56"), dec!(1234.56));
        assert_eq!(coerce_number("1,234,567"), dec!(1234567));
        assert_eq!(coerce_number("26\u{a0}500 €"), dec!(26500));
        assert_eq!(coerce_number("1 200"), dec!(1200));
    }

    #[test]
    fn coerce_number_accepts_scientific_notation() {
        assert_eq!(coerce_number("1e3"), dec!(1000));
    }

    #[test]
    fn coerce_number_empty_is_zero() {
        assert_eq!(coerce_number(""), Decimal::ZERO);
        assert_eq!(coerce_number("   "), Decimal::ZERO);
    }

    #[test]
    fn coerce_number_garbage_is_zero() {
        assert_eq!(coerce_number("abc"), Decimal::ZERO);
        assert_eq!(coerce_number("12m2"), Decimal::ZERO);
        assert_eq!(coerce_number("NaN"), Decimal::ZERO);
    }

    #[test]
    fn coerce_boolean_recognises_checkbox_values() {
        for truthy in ["true", "TRUE", "1", "on", "yes", "oui", " checked "] {
            assert!(coerce_boolean(truthy), "{truthy} should be true");
        }
        for falsy in ["false", "0", "", "off", "no", "maybe"] {
            assert!(!coerce_boolean(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn coerce_field_follows_the_declared_kind() {
        let area = Step::Roofing.field(keys::ROOFING_AREA).unwrap();
        let material = Step::Roofing.field(keys::ROOFING_TYPE).unwrap();
        let flag = Step::EstimationType.field(keys::INCLUDE_OPTIONS).unwrap();
        let features = Step::FeatureChecklist.field(keys::FEATURES).unwrap();

        assert_eq!(
            coerce_field(area, &"100".into()),
            FieldValue::Number(dec!(100))
        );
        assert_eq!(
            coerce_field(material, &" ARDOISE ".into()),
            FieldValue::Text("ARDOISE".into())
        );
        assert_eq!(coerce_field(flag, &true.into()), FieldValue::Flag(true));
        assert_eq!(
            coerce_field(features, &"roofing| kitchen |".into()),
            FieldValue::List(vec!["roofing".into(), "kitchen".into()])
        );
    }

    #[test]
    fn coerce_field_takes_first_item_of_a_list_for_single_values() {
        let area = Step::Roofing.field(keys::ROOFING_AREA).unwrap();
        let material = Step::Roofing.field(keys::ROOFING_TYPE).unwrap();
        let list = RawInput::from(&["80", "90"][..]);

        assert_eq!(coerce_field(area, &list), FieldValue::Number(dec!(80)));
        assert_eq!(
            coerce_field(material, &RawInput::List(vec![])),
            FieldValue::Text(String::new())
        );
    }
}
