pub mod context;
pub mod display;
pub mod dosha;
pub mod envelope;
pub mod error;
pub mod export;
pub mod fallback;
pub mod fixture;
pub mod id;
pub mod intake;
pub mod patient;
pub mod plan;
pub mod prompt;
pub mod summary;
pub mod validation;

pub use context::PatientContext;
pub use display::{DisplayPatient, PatientSource, render_value, to_display_safe};
pub use dosha::{Dosha, DoshaScores};
pub use envelope::{Envelope, Pagination};
pub use error::{DomainError, FieldError, ValidationFailure};
pub use id::PatientId;
pub use patient::{PatientProfile, PatientRecord};
pub use plan::{DietPlan, PlanSource, repair};
pub use validation::validate_patient;
