//! Line-oriented driver for the wizard.
//!
//! Each step's fields are asked in order. Pressing Enter keeps the current
//! answer. `:back`, `:reset` and `:quit` are accepted at any prompt.

use std::io::{BufRead, Write};

use anyhow::Result;
use estimate_core::pricing::{
    BathroomTier, DemolitionKind, EcoSolution, ElectricalGrade, FinishGrade, HeatingSystem,
    HomeOption, InsulationMaterial, KitchenTier, LandscapingWork, MasonryMaterial, PlumbingGrade,
    RenewableSource, RoofingMaterial, RoofingRenovMaterial, Tariff, TerrainKind, WindowFrame,
};
use estimate_core::report::format_euros;
use estimate_core::{
    AnswerSet, ClientType, EstimationType, Feature, FieldKind, FieldSpec, ProjectType,
    ReportSnapshot, Step, WizardError, WizardSession, keys,
};
use tracing::debug;

use crate::utils::field_label;

fn tariff_keys<T: Tariff>() -> Vec<&'static str> {
    T::all().iter().map(Tariff::key).collect()
}

/// Accepted values for a choice field, given the answers so far.
pub fn choices(
    key: &str,
    answers: &AnswerSet,
) -> Vec<&'static str> {
    match key {
        keys::CLIENT_TYPE => [ClientType::Individual, ClientType::Professional]
            .iter()
            .map(ClientType::as_str)
            .collect(),
        keys::PROJECT_TYPE => [
            ProjectType::Construction,
            ProjectType::Extension,
            ProjectType::Renovation,
            ProjectType::Division,
            ProjectType::Design,
        ]
        .iter()
        .map(ProjectType::as_str)
        .collect(),
        keys::ESTIMATION_TYPE => [EstimationType::Quick, EstimationType::Precise]
            .iter()
            .map(EstimationType::as_str)
            .collect(),
        keys::FEATURES => Feature::ALL.iter().map(Feature::as_str).collect(),
        keys::TERRAIN_TYPE => tariff_keys::<TerrainKind>(),
        keys::DEMOLITION_TYPE => tariff_keys::<DemolitionKind>(),
        keys::MASONRY_TYPE => tariff_keys::<MasonryMaterial>(),
        keys::ROOFING_TYPE => {
            if answers.project_type().is_some_and(|p| p.works_on_existing()) {
                tariff_keys::<RoofingRenovMaterial>()
            } else {
                tariff_keys::<RoofingMaterial>()
            }
        }
        keys::WINDOWS_TYPE => tariff_keys::<WindowFrame>(),
        keys::INSULATION_TYPE => tariff_keys::<InsulationMaterial>(),
        keys::ELECTRICAL_TYPE => tariff_keys::<ElectricalGrade>(),
        keys::PLUMBING_TYPE => tariff_keys::<PlumbingGrade>(),
        keys::HEATING_TYPE => tariff_keys::<HeatingSystem>(),
        keys::FINISHES_TYPE => tariff_keys::<FinishGrade>(),
        keys::ECO_SOLUTIONS_TYPE => tariff_keys::<EcoSolution>(),
        keys::RENEWABLE_ENERGY_TYPE => tariff_keys::<RenewableSource>(),
        keys::LANDSCAPING_TYPE => tariff_keys::<LandscapingWork>(),
        keys::OPTIONS_ITEMS => tariff_keys::<HomeOption>(),
        keys::KITCHEN_TYPE => tariff_keys::<KitchenTier>(),
        keys::BATHROOM_TYPE => tariff_keys::<BathroomTier>(),
        _ => Vec::new(),
    }
}

/// What the user typed at one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Value(String),
    Keep,
    Back,
    Reset,
    Quit,
}

impl Reply {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Keep,
            ":back" | ":b" => Self::Back,
            ":reset" => Self::Reset,
            ":quit" | ":q" => Self::Quit,
            value => Self::Value(value.to_string()),
        }
    }
}

fn prompt_text(
    field: &FieldSpec,
    answers: &AnswerSet,
) -> String {
    let mut text = field_label(field.key);
    let options = choices(field.key, answers);
    match field.kind {
        FieldKind::Choice => text.push_str(&format!(" [{}]", options.join(", "))),
        FieldKind::Choices => text.push_str(&format!(" [{}] (separate with |)", options.join(", "))),
        FieldKind::Flag => text.push_str(" (y/n)"),
        FieldKind::Number | FieldKind::Text => {}
    }
    if !field.required {
        text.push_str(" (optional)");
    }
    if let Some(current) = answers.get(field.key) {
        text.push_str(&format!(" <{current}>"));
    }
    text.push_str(": ");
    text
}

/// Drives `session` from `input` until the thank-you step.
///
/// Returns the finished snapshot, or `None` when the user quits or input ends.
/// Progress is saved by the session after every step either way.
pub async fn run_interactive<R: BufRead, W: Write>(
    session: &mut WizardSession,
    mut input: R,
    mut out: W,
) -> Result<Option<ReportSnapshot>> {
    'steps: loop {
        let step = session.wizard().step();
        if step.is_terminal() {
            writeln!(out, "\nThank you! Your estimation is complete.")?;
            return Ok(Some(session.finish().await?));
        }

        writeln!(out, "\n[{}/{}] {}", step.id(), Step::MAX_ID, step.title())?;
        let answers = session.wizard().answers().clone();
        let mut inputs: Vec<(&'static str, String)> = Vec::new();

        for field in step.fields() {
            write!(out, "{}", prompt_text(field, &answers))?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(None);
            }

            match Reply::parse(&line) {
                Reply::Value(value) => inputs.push((field.key, value)),
                Reply::Keep if answers.get(field.key).is_some() => {}
                Reply::Keep => inputs.push((field.key, String::new())),
                Reply::Back => {
                    let transition = session.back().await;
                    debug!(step = %transition.step, "went back");
                    continue 'steps;
                }
                Reply::Reset => {
                    session.reset().await;
                    writeln!(out, "Starting over.")?;
                    continue 'steps;
                }
                Reply::Quit => {
                    writeln!(out, "Progress saved.")?;
                    return Ok(None);
                }
            }
        }

        match session.submit(inputs).await {
            Ok(outcome) => {
                writeln!(out, "Running total: {}", format_euros(outcome.running_total))?;
            }
            Err(WizardError::Validation(errors)) => {
                for error in errors {
                    writeln!(out, "  ! {error}")?;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use estimate_core::{FORM_DATA_KEY, FormCache, MemoryCache};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    async fn drive(script: &str) -> (Arc<MemoryCache>, Option<ReportSnapshot>, String) {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        let mut out = Vec::new();

        let result = run_interactive(&mut session, script.as_bytes(), &mut out)
            .await
            .unwrap();

        (cache, result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn replies() {
        assert_eq!(Reply::parse("  \n"), Reply::Keep);
        assert_eq!(Reply::parse(":b\n"), Reply::Back);
        assert_eq!(Reply::parse(" ARDOISE \n"), Reply::Value("ARDOISE".to_string()));
    }

    #[test]
    fn roofing_choices_follow_project_type() {
        let new_build = AnswerSet::new();
        let renovation = AnswerSet::new().with(
            keys::PROJECT_TYPE,
            estimate_core::FieldValue::Text("renovation".to_string()),
        );

        assert_eq!(choices(keys::ROOFING_TYPE, &new_build), tariff_keys::<RoofingMaterial>());
        assert_eq!(
            choices(keys::ROOFING_TYPE, &renovation),
            tariff_keys::<RoofingRenovMaterial>()
        );
        assert!(choices(keys::CONTACT_NAME, &new_build).is_empty());
    }

    #[tokio::test]
    async fn design_project_finishes() {
        let script = "individual\ndesign\nCamille Martin\ncamille@example.fr\n\n";

        let (cache, result, transcript) = drive(script).await;

        let snapshot = result.expect("finished");
        assert_eq!(snapshot.running_total, dec!(0));
        assert!(transcript.contains("[1/23] "));
        assert!(transcript.contains("Thank you!"));
        assert_eq!(cache.get(FORM_DATA_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn validation_errors_repeat_the_step() {
        let script = "\nindividual\n:quit\n";

        let (cache, result, transcript) = drive(script).await;

        assert_eq!(result, None);
        assert!(transcript.contains("  ! clientType: please select an option"));
        assert!(transcript.contains("Progress saved."));
        assert!(cache.get(FORM_DATA_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn back_returns_to_the_previous_step() {
        let script = "individual\n:back\nprofessional\n";

        let (_cache, result, transcript) = drive(script).await;

        assert_eq!(result, None);
        assert_eq!(transcript.matches("[1/23] ").count(), 2);
        assert!(transcript.contains("[2/23] "));
        assert!(transcript.contains("<individual>"));
    }

    #[tokio::test]
    async fn end_of_input_stops_without_finishing() {
        let (_cache, result, transcript) = drive("").await;

        assert_eq!(result, None);
        assert!(transcript.starts_with("\n[1/23] "));
    }
}
