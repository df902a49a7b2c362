mod answers;
mod profile;
mod step;

pub use answers::{AnswerSet, FieldValue, keys};
pub use profile::{ClientType, EstimationType, Feature, ProjectType};
pub use step::{Direction, FieldKind, FieldSpec, Step, StepKey, Transition};
