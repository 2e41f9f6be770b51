use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interaction severity, ordered weakest to strongest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InteractionSeverity {
    /// Monitor for effects.
    Minor,
    /// Use with caution.
    Moderate,
    /// Avoid combination if possible.
    Major,
    /// Never combine.
    Contraindicated,
}

impl InteractionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionSeverity::Minor => "minor",
            InteractionSeverity::Moderate => "moderate",
            InteractionSeverity::Major => "major",
            InteractionSeverity::Contraindicated => "contraindicated",
        }
    }
}

impl fmt::Display for InteractionSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved interaction between two drugs (or a drug and a class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugInteraction {
    pub drug1: String,
    pub drug2: String,
    pub severity: InteractionSeverity,
    pub description: String,
    pub mechanism: Option<String>,
    pub recommendation: String,
}

impl DrugInteraction {
    /// The severity-tagged warning line appended to a generated response.
    pub fn warning_message(&self) -> String {
        let mechanism = self
            .mechanism
            .as_deref()
            .map(|m| format!(" Mechanism: {m}."))
            .unwrap_or_default();
        format!(
            "[{}] {} + {}: {}.{} {}. Confirm with a pharmacist or doctor before combining medications.",
            self.severity.as_str().to_uppercase(),
            self.drug1,
            self.drug2,
            self.description,
            mechanism,
            self.recommendation,
        )
    }
}

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Interaction API unavailable: {0}")]
    ApiUnavailable(String),

    #[error("Interaction API returned malformed data: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_weakest_to_strongest() {
        assert!(InteractionSeverity::Minor < InteractionSeverity::Moderate);
        assert!(InteractionSeverity::Major < InteractionSeverity::Contraindicated);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&InteractionSeverity::Contraindicated).unwrap();
        assert_eq!(json, r#""contraindicated""#);
    }

    #[test]
    fn warning_message_includes_severity_tag_and_disclaimer() {
        let interaction = DrugInteraction {
            drug1: "warfarin".into(),
            drug2: "ibuprofen".into(),
            severity: InteractionSeverity::Major,
            description: "Increased bleeding risk".into(),
            mechanism: Some("Additive anticoagulant effects".into()),
            recommendation: "Avoid the combination".into(),
        };
        let msg = interaction.warning_message();
        assert!(msg.starts_with("[MAJOR]"));
        assert!(msg.contains("warfarin + ibuprofen"));
        assert!(msg.contains("Mechanism:"));
        assert!(msg.contains("pharmacist"));
    }

    #[test]
    fn warning_message_without_mechanism_omits_section() {
        let interaction = DrugInteraction {
            drug1: "a".into(),
            drug2: "b".into(),
            severity: InteractionSeverity::Minor,
            description: "Minor effect".into(),
            mechanism: None,
            recommendation: "Monitor".into(),
        };
        assert!(!interaction.warning_message().contains("Mechanism:"));
    }
}
