pub mod accumulator;
pub mod cache;
pub mod coerce;
pub mod export;
pub mod models;
pub mod navigation;
pub mod pricing;
pub mod report;
pub mod session;
pub mod validation;
pub mod wizard;

pub use accumulator::{CostLedger, StepCost, fold, step_cost};
pub use cache::{
    CacheConfig, CacheError, CacheRegistry, FORM_DATA_KEY, FormCache, MemoryCache, SavedForm,
};
pub use coerce::{RawInput, coerce_boolean, coerce_number};
pub use export::{ExportError, ExportNotice, ExportOptions, Exporter, dispatch_exports};
pub use models::*;
pub use navigation::{forward_route, next_step, previous_step};
pub use report::{EstimateReport, ReportConfig, ReportKind, ReportSnapshot};
pub use session::WizardSession;
pub use validation::FieldError;
pub use wizard::{FormState, StepOutcome, Wizard, WizardError};
