pub mod audit;
pub mod conflicts;
pub mod guardrail;
pub mod medication_request;
pub mod restricted;
pub mod sanitize;
pub mod self_harm;
pub mod types;

pub use audit::{AuditEntry, AuditSink, TracingAuditSink};
pub use guardrail::{RestrictedDrugSource, SafetyGuardrail};
pub use types::{EmergencyLevel, SafetyError, SafetyValidationResult};
