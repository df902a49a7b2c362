//! Field checks run before a step is allowed to advance.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{
    AnswerSet, ClientType, EstimationType, FieldKind, FieldValue, ProjectType, Step, keys,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+33[\s.-]?[1-9]|0[1-9])(?:[\s.-]?\d{2}){4}$").expect("phone pattern is valid")
});

/// A blocking problem with one field of the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn is_present(value: Option<&FieldValue>) -> bool {
    match value {
        Some(FieldValue::Text(s)) => !s.trim().is_empty(),
        Some(FieldValue::List(items)) => !items.is_empty(),
        Some(FieldValue::Number(_)) | Some(FieldValue::Flag(_)) => true,
        None => false,
    }
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

pub fn is_valid_phone(s: &str) -> bool {
    PHONE.is_match(s.trim())
}

/// Checks the answers `step` collects. An empty result means the step may
/// advance.
pub fn validate_step(
    step: Step,
    answers: &AnswerSet,
) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = step
        .fields()
        .iter()
        .filter(|field| field.required && !is_present(answers.get(field.key)))
        .map(|field| match field.kind {
            FieldKind::Choice | FieldKind::Choices => {
                FieldError::new(field.key, "please select an option")
            }
            _ => FieldError::new(field.key, "this field is required"),
        })
        .collect();

    let unknown = |key: &str, what: &str, known: fn(&str) -> bool| {
        answers
            .text(key)
            .filter(|value| !known(value))
            .map(|value| FieldError::new(key, format!("unknown {what} '{value}'")))
    };

    match step {
        Step::ClientType => errors.extend(unknown(keys::CLIENT_TYPE, "client type", |v| {
            ClientType::parse(v).is_some()
        })),
        Step::ProfessionalProject | Step::IndividualProject => {
            errors.extend(unknown(keys::PROJECT_TYPE, "project type", |v| {
                ProjectType::parse(v).is_some()
            }))
        }
        Step::EstimationType => {
            errors.extend(unknown(keys::ESTIMATION_TYPE, "estimation type", |v| {
                EstimationType::parse(v).is_some()
            }))
        }
        Step::Contact => {
            if answers
                .text(keys::CONTACT_EMAIL)
                .is_some_and(|email| !is_valid_email(email))
            {
                errors.push(FieldError::new(
                    keys::CONTACT_EMAIL,
                    "please enter a valid e-mail address",
                ));
            }
            if answers
                .text(keys::CONTACT_PHONE)
                .is_some_and(|phone| !is_valid_phone(phone))
            {
                errors.push(FieldError::new(
                    keys::CONTACT_PHONE,
                    "please enter a 10-digit phone number",
                ));
            }
        }
        _ => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(
        answers: AnswerSet,
        key: &str,
        value: &str,
    ) -> AnswerSet {
        answers.with(key, FieldValue::Text(value.to_string()))
    }

    #[test]
    fn missing_required_choice_is_reported() {
        let errors = validate_step(Step::ClientType, &AnswerSet::new());

        assert_eq!(
            errors,
            vec![FieldError::new(keys::CLIENT_TYPE, "please select an option")]
        );
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let answers = text(AnswerSet::new(), keys::TERRAIN_TYPE, "   ");

        let errors = validate_step(Step::Terrain, &answers);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, keys::TERRAIN_TYPE);
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let answers = text(AnswerSet::new(), keys::ROOFING_TYPE, "ARDOISE");

        assert!(validate_step(Step::Roofing, &answers).is_empty());
    }

    #[test]
    fn steps_without_required_fields_always_pass() {
        assert!(validate_step(Step::Options, &AnswerSet::new()).is_empty());
        assert!(validate_step(Step::FeatureChecklist, &AnswerSet::new()).is_empty());
    }

    #[test]
    fn unknown_client_type_is_rejected() {
        let answers = text(AnswerSet::new(), keys::CLIENT_TYPE, "robot");

        let errors = validate_step(Step::ClientType, &answers);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("robot"));
    }

    #[test]
    fn unknown_trade_selection_is_not_a_validation_error() {
        let answers = text(AnswerSet::new(), keys::KITCHEN_TYPE, "CUISINE EN OR");

        assert!(validate_step(Step::Kitchen, &answers).is_empty());
    }

    #[test]
    fn contact_requires_name_and_email() {
        let fields: Vec<String> = validate_step(Step::Contact, &AnswerSet::new())
            .into_iter()
            .map(|e| e.field)
            .collect();

        assert_eq!(fields, vec![keys::CONTACT_NAME, keys::CONTACT_EMAIL]);
    }

    #[test]
    fn contact_checks_email_format() {
        let answers = text(AnswerSet::new(), keys::CONTACT_NAME, "Camille Martin");
        let answers = text(answers, keys::CONTACT_EMAIL, "camille.martin");

        let errors = validate_step(Step::Contact, &answers);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, keys::CONTACT_EMAIL);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("camille@example.fr"));
        assert!(is_valid_email(" c.martin+devis@mail.example.com "));
        assert!(!is_valid_email("camille@example"));
        assert!(!is_valid_email("camille example@test.fr"));
        assert!(!is_valid_email("@example.fr"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("0612345678"));
        assert!(is_valid_phone("06 12 34 56 78"));
        assert!(is_valid_phone("06.12.34.56.78"));
        assert!(is_valid_phone("06-12-34-56-78"));
        assert!(is_valid_phone("+33 6 12 34 56 78"));
        assert!(is_valid_phone("+33612345678"));
        assert!(!is_valid_phone("061234567"));
        assert!(!is_valid_phone("00 12 34 56 78"));
        assert!(!is_valid_phone("phone"));
    }

    #[test]
    fn optional_phone_is_checked_when_present() {
        let answers = text(AnswerSet::new(), keys::CONTACT_NAME, "Camille Martin");
        let answers = text(answers, keys::CONTACT_EMAIL, "camille@example.fr");
        let answers = text(answers, keys::CONTACT_PHONE, "12");

        let errors = validate_step(Step::Contact, &answers);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, keys::CONTACT_PHONE);
    }
}
