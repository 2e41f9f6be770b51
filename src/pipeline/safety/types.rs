use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Escalation level attached to a safety validation outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Outcome of the safety guardrail. `is_safe = false` stops the pipeline;
/// warnings and the review flag travel with the response otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyValidationResult {
    pub is_safe: bool,
    pub reason: Option<String>,
    pub warnings: Vec<String>,
    pub requires_professional_review: bool,
    pub emergency_level: EmergencyLevel,
}

impl SafetyValidationResult {
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            reason: None,
            warnings: Vec::new(),
            requires_professional_review: false,
            emergency_level: EmergencyLevel::None,
        }
    }

    pub fn unsafe_because(reason: impl Into<String>) -> Self {
        Self {
            is_safe: false,
            reason: Some(reason.into()),
            warnings: Vec::new(),
            requires_professional_review: false,
            emergency_level: EmergencyLevel::None,
        }
    }

    /// An inability to evaluate safety is never treated as "safe".
    pub fn fail_closed() -> Self {
        Self {
            is_safe: false,
            reason: Some("Safety validation could not be completed".into()),
            warnings: vec![
                "A system error prevented the safety checks from running; the query was not processed.".into(),
            ],
            requires_professional_review: false,
            emergency_level: EmergencyLevel::Medium,
        }
    }
}

/// Result of input sanitization (pre-prompt).
#[derive(Debug, Clone)]
pub struct SanitizedInput {
    /// The cleaned query text.
    pub text: String,
    /// Whether any modifications were made.
    pub was_modified: bool,
    /// What was stripped (for audit, no patient data).
    pub modifications: Vec<InputModification>,
}

#[derive(Debug, Clone)]
pub struct InputModification {
    pub kind: InputModificationKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputModificationKind {
    InvisibleUnicodeRemoved,
    InjectionPatternRemoved,
    ExcessiveLengthTruncated,
    ControlCharacterRemoved,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Input sanitization failed: {0}")]
    SanitizationFailed(String),

    #[error("Audit sink failed: {0}")]
    AuditFailed(String),

    #[error("Restricted drug list unavailable: {0}")]
    RestrictedListUnavailable(String),

    #[error("Safety validation internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_level_orders_by_severity() {
        assert!(EmergencyLevel::None < EmergencyLevel::Low);
        assert!(EmergencyLevel::Medium < EmergencyLevel::High);
        assert!(EmergencyLevel::High < EmergencyLevel::Critical);
    }

    #[test]
    fn emergency_level_serializes_snake_case() {
        let json = serde_json::to_string(&EmergencyLevel::High).unwrap();
        assert_eq!(json, r#""high""#);
    }

    #[test]
    fn fail_closed_is_unsafe_at_medium() {
        let result = SafetyValidationResult::fail_closed();
        assert!(!result.is_safe);
        assert_eq!(result.emergency_level, EmergencyLevel::Medium);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn safe_result_has_no_reason() {
        let result = SafetyValidationResult::safe();
        assert!(result.is_safe);
        assert!(result.reason.is_none());
        assert_eq!(result.emergency_level, EmergencyLevel::None);
    }
}
