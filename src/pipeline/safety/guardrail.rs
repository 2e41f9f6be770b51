//! The safety guardrail: runs every non-emergency check in a fixed order
//! and audits the decision. This is the one stage that fails CLOSED: if
//! validation itself breaks, the query is treated as unsafe.

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;

use crate::models::{MedicalQuery, UserMedicalProfile};

use super::audit::{AuditEntry, AuditSink, TracingAuditSink};
use super::conflicts::check_condition_conflicts;
use super::medication_request::detect_medication_request;
use super::restricted::{check_restricted, default_restricted_drugs};
use super::self_harm::{detect_self_harm, support_message};
use super::types::{EmergencyLevel, SafetyError, SafetyValidationResult};

/// External provider of the restricted-drug list. Falls back to the static
/// default list on failure. The lookup fails open; validation itself still
/// fails closed.
#[async_trait]
pub trait RestrictedDrugSource: Send + Sync {
    async fn restricted_drugs(&self) -> Result<Vec<String>, SafetyError>;
}

pub struct SafetyGuardrail<A: AuditSink = TracingAuditSink> {
    audit: A,
    restricted_drugs: Vec<String>,
}

impl Default for SafetyGuardrail<TracingAuditSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyGuardrail<TracingAuditSink> {
    pub fn new() -> Self {
        Self::with_audit_sink(TracingAuditSink)
    }
}

impl<A: AuditSink> SafetyGuardrail<A> {
    pub fn with_audit_sink(audit: A) -> Self {
        Self {
            audit,
            restricted_drugs: default_restricted_drugs(),
        }
    }

    pub fn with_restricted_drugs(mut self, drugs: Vec<String>) -> Self {
        self.restricted_drugs = drugs;
        self
    }

    /// Build a guardrail whose restricted-drug list comes from an external
    /// source, falling back to the static default when the source fails.
    pub async fn from_drug_source<S: RestrictedDrugSource>(audit: A, source: &S) -> Self {
        let restricted_drugs = match source.restricted_drugs().await {
            Ok(drugs) if !drugs.is_empty() => drugs,
            Ok(_) => default_restricted_drugs(),
            Err(e) => {
                tracing::warn!(error = %e, "Restricted drug list unavailable; using default");
                default_restricted_drugs()
            }
        };
        Self {
            audit,
            restricted_drugs,
        }
    }

    /// Validate a non-emergency query against safety policy. Always returns
    /// a result: internal failures produce the fail-closed outcome, and
    /// audit failures are swallowed.
    pub async fn validate_query(
        &self,
        query: &MedicalQuery,
        profile: &UserMedicalProfile,
    ) -> SafetyValidationResult {
        let evaluated = catch_unwind(AssertUnwindSafe(|| self.evaluate(query, profile)));
        let result = match evaluated {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Safety validation panicked; failing closed");
                SafetyValidationResult::fail_closed()
            }
        };

        let entry = AuditEntry::new(&query.text, &result);
        if let Err(e) = self.audit.record(entry).await {
            tracing::debug!(error = %e, "Audit sink failed; decision unaffected");
        }

        result
    }

    /// The ordered check battery. Restricted topics and self-harm are hard
    /// blocks; medication requests and condition conflicts only annotate.
    fn evaluate(
        &self,
        query: &MedicalQuery,
        profile: &UserMedicalProfile,
    ) -> SafetyValidationResult {
        let lower = query.text.to_lowercase();

        if let Some(reason) = check_restricted(&lower, &self.restricted_drugs) {
            tracing::warn!(reason = %reason, "Query blocked: restricted topic");
            let mut result = SafetyValidationResult::unsafe_because(reason);
            result.emergency_level = EmergencyLevel::Low;
            return result;
        }

        if let Some(keyword) = detect_self_harm(&lower) {
            tracing::warn!(keyword, "Query blocked: self-harm indicators");
            let mut result = SafetyValidationResult::unsafe_because(
                "Self-harm indicators detected; routed to support resources",
            );
            result.emergency_level = EmergencyLevel::High;
            result.requires_professional_review = true;
            result.warnings.push(support_message());
            return result;
        }

        let mut result = SafetyValidationResult::safe();

        if let Some(request) = detect_medication_request(&lower) {
            if request.prescription_only {
                tracing::info!(
                    medication = %request.medication,
                    "Prescription-only medication request; flagging for review"
                );
                result.requires_professional_review = true;
                result.warnings.push(format!(
                    "{} is prescription-only. Only a licensed clinician who knows your \
                     history can decide whether it is appropriate for you.",
                    request.medication
                ));
            }
        }

        result
            .warnings
            .extend(check_condition_conflicts(&lower, &profile.conditions));

        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn query(text: &str) -> MedicalQuery {
        MedicalQuery::new(text, "user-1")
    }

    /// Audit sink that counts calls and optionally fails.
    #[derive(Default)]
    struct CountingSink {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AuditSink for CountingSink {
        async fn record(&self, _entry: AuditEntry) -> Result<(), SafetyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SafetyError::AuditFailed("sink down".into()))
            } else {
                Ok(())
            }
        }
    }

    // =================================================================
    // ORDERED CHECKS
    // =================================================================

    #[tokio::test]
    async fn oxycodone_drug_seeking_is_blocked() {
        let guardrail = SafetyGuardrail::new();
        let result = guardrail
            .validate_query(
                &query("how do I get oxycodone without a prescription"),
                &UserMedicalProfile::empty(),
            )
            .await;
        assert!(!result.is_safe);
        assert!(result.reason.is_some());
    }

    #[tokio::test]
    async fn self_harm_blocks_at_high_level_with_review() {
        let guardrail = SafetyGuardrail::new();
        let result = guardrail
            .validate_query(
                &query("I keep thinking about hurting myself"),
                &UserMedicalProfile::empty(),
            )
            .await;
        assert!(!result.is_safe);
        assert_eq!(result.emergency_level, EmergencyLevel::High);
        assert!(result.requires_professional_review);
        assert!(result.warnings.iter().any(|w| w.contains("crisis line")));
    }

    #[tokio::test]
    async fn prescription_only_request_flags_review_without_blocking() {
        let guardrail = SafetyGuardrail::new();
        let result = guardrail
            .validate_query(
                &query("can I take amoxicillin for my sore throat"),
                &UserMedicalProfile::empty(),
            )
            .await;
        assert!(result.is_safe);
        assert!(result.requires_professional_review);
        assert!(result.warnings.iter().any(|w| w.contains("amoxicillin")));
    }

    #[tokio::test]
    async fn condition_conflict_warns_without_blocking() {
        let mut profile = UserMedicalProfile::empty();
        profile.conditions = vec!["hypertension".into()];
        let guardrail = SafetyGuardrail::new();
        let result = guardrail
            .validate_query(&query("is pseudoephedrine safe for a cold"), &profile)
            .await;
        assert!(result.is_safe);
        assert!(!result.requires_professional_review);
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn benign_query_is_safe_and_clean() {
        let guardrail = SafetyGuardrail::new();
        let result = guardrail
            .validate_query(
                &query("What's a healthy breakfast?"),
                &UserMedicalProfile::empty(),
            )
            .await;
        assert!(result.is_safe);
        assert!(result.warnings.is_empty());
        assert_eq!(result.emergency_level, EmergencyLevel::None);
        assert!(!result.requires_professional_review);
    }

    // =================================================================
    // AUDIT BEHAVIOR
    // =================================================================

    #[tokio::test]
    async fn every_validation_is_audited() {
        let guardrail = SafetyGuardrail::with_audit_sink(CountingSink::default());
        guardrail
            .validate_query(&query("is coffee healthy"), &UserMedicalProfile::empty())
            .await;
        guardrail
            .validate_query(&query("prescribe me opioids"), &UserMedicalProfile::empty())
            .await;
        assert_eq!(guardrail.audit.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn audit_failure_is_swallowed() {
        let guardrail = SafetyGuardrail::with_audit_sink(CountingSink {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let result = guardrail
            .validate_query(&query("is coffee healthy"), &UserMedicalProfile::empty())
            .await;
        assert!(result.is_safe);
        assert_eq!(guardrail.audit.calls.load(Ordering::SeqCst), 1);
    }

    // =================================================================
    // RESTRICTED DRUG SOURCE
    // =================================================================

    struct FailingSource;

    #[async_trait]
    impl RestrictedDrugSource for FailingSource {
        async fn restricted_drugs(&self) -> Result<Vec<String>, SafetyError> {
            Err(SafetyError::RestrictedListUnavailable("timeout".into()))
        }
    }

    struct CustomSource;

    #[async_trait]
    impl RestrictedDrugSource for CustomSource {
        async fn restricted_drugs(&self) -> Result<Vec<String>, SafetyError> {
            Ok(vec!["zolpidem".into()])
        }
    }

    #[tokio::test]
    async fn failing_source_falls_back_to_default_list() {
        let guardrail =
            SafetyGuardrail::from_drug_source(TracingAuditSink, &FailingSource).await;
        let result = guardrail
            .validate_query(
                &query("where can i get some xanax"),
                &UserMedicalProfile::empty(),
            )
            .await;
        // xanax is on the default list, so the fallback list is in effect
        assert!(!result.is_safe);
    }

    #[tokio::test]
    async fn custom_source_list_is_used() {
        let guardrail =
            SafetyGuardrail::from_drug_source(TracingAuditSink, &CustomSource).await;
        let result = guardrail
            .validate_query(
                &query("where can i get some zolpidem"),
                &UserMedicalProfile::empty(),
            )
            .await;
        assert!(!result.is_safe);
    }
}
