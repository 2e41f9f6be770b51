//! Post-generation interaction checking: scans the *generated* answer for
//! drug mentions and checks them against the user's recorded medications.
//! Warnings annotate the response; they never block delivery.

use async_trait::async_trait;

use super::aliases::{extract_drug_mentions, normalize};
use super::table::resolve_interaction;
use super::types::{DrugInteraction, InteractionError};

/// Optional external interaction lookup. Strictly best-effort: any failure
/// is treated as "no interaction found".
#[async_trait]
pub trait InteractionApi: Send + Sync {
    async fn lookup(
        &self,
        drug_a: &str,
        drug_b: &str,
    ) -> Result<Option<DrugInteraction>, InteractionError>;
}

#[derive(Default)]
pub struct DrugInteractionChecker {
    external: Option<Box<dyn InteractionApi>>,
}

impl DrugInteractionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external_api(api: Box<dyn InteractionApi>) -> Self {
        Self {
            external: Some(api),
        }
    }

    /// Check every distinct (user medication, mentioned drug) pair. Runs
    /// only when the user has recorded medications; an empty list always
    /// yields an empty result regardless of the text.
    pub async fn check_interactions(
        &self,
        generated_text: &str,
        user_medications: &[String],
    ) -> Vec<DrugInteraction> {
        if user_medications.is_empty() {
            return Vec::new();
        }

        let mentioned = extract_drug_mentions(generated_text);
        if mentioned.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<DrugInteraction> = Vec::new();

        for medication in user_medications {
            let med = normalize(medication);
            for mention in &mentioned {
                let mention = normalize(mention);
                if med == mention {
                    continue;
                }
                if found
                    .iter()
                    .any(|i| pair_matches(i, &med, &mention))
                {
                    continue;
                }

                if let Some(hit) = resolve_interaction(&med, &mention) {
                    tracing::info!(
                        drug1 = %med,
                        drug2 = %mention,
                        severity = hit.severity.as_str(),
                        "Drug interaction flagged in generated response"
                    );
                    found.push(DrugInteraction {
                        drug1: med.clone(),
                        drug2: mention.clone(),
                        severity: hit.severity,
                        description: hit.description.to_string(),
                        mechanism: hit.mechanism.map(str::to_string),
                        recommendation: hit.recommendation.to_string(),
                    });
                } else if let Some(api) = &self.external {
                    match api.lookup(&med, &mention).await {
                        Ok(Some(interaction)) => found.push(interaction),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::debug!(
                                error = %e,
                                "External interaction lookup failed; treated as no interaction"
                            );
                        }
                    }
                }
            }
        }

        found
    }
}

fn pair_matches(interaction: &DrugInteraction, a: &str, b: &str) -> bool {
    (interaction.drug1 == a && interaction.drug2 == b)
        || (interaction.drug1 == b && interaction.drug2 == a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::interactions::types::InteractionSeverity;

    fn meds(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    // =================================================================
    // STATIC TABLE PATH
    // =================================================================

    #[tokio::test]
    async fn empty_medications_always_yields_empty() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions("warfarin and ibuprofen interact badly", &[])
            .await;
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn warfarin_user_warned_about_ibuprofen_mention() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions(
                "For mild pain you could consider ibuprofen with food.",
                &meds(&["warfarin"]),
            )
            .await;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, InteractionSeverity::Major);
        assert!(warnings[0].description.contains("bleeding"));
    }

    #[tokio::test]
    async fn interaction_is_symmetric() {
        let checker = DrugInteractionChecker::new();
        let forward = checker
            .check_interactions("consider ibuprofen", &meds(&["warfarin"]))
            .await;
        let reverse = checker
            .check_interactions("your warfarin dose", &meds(&["ibuprofen"]))
            .await;
        assert_eq!(forward.len(), 1);
        assert_eq!(reverse.len(), 1);
        assert_eq!(forward[0].severity, reverse[0].severity);
        assert_eq!(forward[0].description, reverse[0].description);
    }

    #[tokio::test]
    async fn brand_name_medication_is_normalized() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions("ibuprofen can help", &meds(&["Coumadin"]))
            .await;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].drug1, "warfarin");
    }

    #[tokio::test]
    async fn same_drug_is_not_an_interaction() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions("your warfarin dose looks right", &meds(&["warfarin"]))
            .await;
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn duplicate_pairs_reported_once() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions(
                "ibuprofen or Advil or more ibuprofen",
                &meds(&["warfarin"]),
            )
            .await;
        assert_eq!(warnings.len(), 1);
    }

    #[tokio::test]
    async fn text_without_drug_mentions_is_clean() {
        let checker = DrugInteractionChecker::new();
        let warnings = checker
            .check_interactions("rest, fluids, and sleep", &meds(&["warfarin"]))
            .await;
        assert!(warnings.is_empty());
    }

    // =================================================================
    // EXTERNAL API PATH
    // =================================================================

    struct FailingApi;

    #[async_trait]
    impl InteractionApi for FailingApi {
        async fn lookup(
            &self,
            _a: &str,
            _b: &str,
        ) -> Result<Option<DrugInteraction>, InteractionError> {
            Err(InteractionError::ApiUnavailable("connection refused".into()))
        }
    }

    struct KnowsOnePair;

    #[async_trait]
    impl InteractionApi for KnowsOnePair {
        async fn lookup(
            &self,
            a: &str,
            b: &str,
        ) -> Result<Option<DrugInteraction>, InteractionError> {
            let pair = (a.to_string(), b.to_string());
            if (pair.0 == "metformin" && pair.1 == "omeprazole")
                || (pair.0 == "omeprazole" && pair.1 == "metformin")
            {
                Ok(Some(DrugInteraction {
                    drug1: pair.0,
                    drug2: pair.1,
                    severity: InteractionSeverity::Minor,
                    description: "Possible minor absorption change".into(),
                    mechanism: None,
                    recommendation: "No action usually needed".into(),
                }))
            } else {
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn api_failure_means_no_interaction() {
        let checker = DrugInteractionChecker::with_external_api(Box::new(FailingApi));
        let warnings = checker
            .check_interactions("omeprazole can help with reflux", &meds(&["metformin"]))
            .await;
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn api_hit_is_reported_for_pairs_unknown_to_static_table() {
        let checker = DrugInteractionChecker::with_external_api(Box::new(KnowsOnePair));
        let warnings = checker
            .check_interactions("omeprazole can help with reflux", &meds(&["metformin"]))
            .await;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, InteractionSeverity::Minor);
    }
}
