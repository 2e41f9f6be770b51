//! The pipeline itself: a linear pass over a query with four terminal
//! states. Emergency routing and safety blocks exit early; generation
//! failure is the only fatal path; everything else degrades and continues.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::models::{MedicalQuery, MedicalResponse, ResponseMetadata, ResponseType, UserMedicalProfile};
use crate::pipeline::context::MedicalContextBuilder;
use crate::pipeline::emergency::{check_for_emergency, check_for_emergency_in, EmergencyCheckResult};
use crate::pipeline::generate::{GenerationError, GenerationOptions, ModelClient};
use crate::pipeline::interactions::{scan_contraindications, DrugInteractionChecker};
use crate::pipeline::location::{CountryMedicalInfo, LocationInfoSource};
use crate::pipeline::profile_store::ProfileStore;
use crate::pipeline::safety::{
    sanitize::sanitize_query, AuditSink, SafetyGuardrail, SafetyValidationResult, TracingAuditSink,
};

const SYSTEM_PROMPT: &str = "\
You are a careful medical information assistant. You provide general health \
information, never diagnoses or prescriptions. You always recommend \
professional care for personal medical decisions.";

/// Where a pipeline run ended. Every variant maps to exactly one response
/// shape in [`MedicalAiService::process_query`].
enum StageOutcome {
    Emergency(EmergencyCheckResult),
    Blocked(SafetyValidationResult),
    Failed(GenerationError),
    Completed {
        text: String,
        safety: SafetyValidationResult,
        interaction_warnings: Vec<String>,
        profile: UserMedicalProfile,
        location_aware: bool,
    },
}

/// End-to-end query pipeline over pluggable collaborators.
pub struct MedicalAiService<P, L, G, A = TracingAuditSink>
where
    P: ProfileStore,
    L: LocationInfoSource,
    G: ModelClient,
    A: AuditSink,
{
    profiles: P,
    locations: L,
    model: G,
    guardrail: SafetyGuardrail<A>,
    context_builder: MedicalContextBuilder,
    interactions: DrugInteractionChecker,
    config: PipelineConfig,
}

impl<P, L, G> MedicalAiService<P, L, G, TracingAuditSink>
where
    P: ProfileStore,
    L: LocationInfoSource,
    G: ModelClient,
{
    pub fn new(profiles: P, locations: L, model: G, config: PipelineConfig) -> Self {
        Self {
            profiles,
            locations,
            model,
            guardrail: SafetyGuardrail::new(),
            context_builder: MedicalContextBuilder::new(),
            interactions: DrugInteractionChecker::new(),
            config,
        }
    }
}

impl<P, L, G, A> MedicalAiService<P, L, G, A>
where
    P: ProfileStore,
    L: LocationInfoSource,
    G: ModelClient,
    A: AuditSink,
{
    pub fn with_guardrail(
        profiles: P,
        locations: L,
        model: G,
        guardrail: SafetyGuardrail<A>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            profiles,
            locations,
            model,
            guardrail,
            context_builder: MedicalContextBuilder::new(),
            interactions: DrugInteractionChecker::new(),
            config,
        }
    }

    pub fn with_interaction_checker(mut self, interactions: DrugInteractionChecker) -> Self {
        self.interactions = interactions;
        self
    }

    /// Process one query end to end. Never fails: every outcome, including
    /// internal errors, is rendered as a [`MedicalResponse`].
    pub async fn process_query(&self, query: &MedicalQuery) -> MedicalResponse {
        let started = Instant::now();
        let outcome = self.run_stages(query).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let metadata = ResponseMetadata::new(elapsed_ms, &self.config.model);

        match outcome {
            StageOutcome::Emergency(check) => {
                info!(
                    condition = check.condition.as_deref().unwrap_or("unknown"),
                    "Emergency detected, routing to emergency response"
                );
                emergency_response(&check, metadata)
            }
            StageOutcome::Blocked(safety) => {
                info!("Query blocked by safety validation");
                blocked_response(&safety, metadata)
            }
            StageOutcome::Failed(err) => {
                warn!(error = %err, "Generation failed");
                error_response(metadata)
            }
            StageOutcome::Completed {
                text,
                safety,
                interaction_warnings,
                profile,
                location_aware,
            } => success_response(
                query,
                text,
                safety,
                interaction_warnings,
                &profile,
                location_aware,
                metadata,
            ),
        }
    }

    async fn run_stages(&self, query: &MedicalQuery) -> StageOutcome {
        // Emergency scan runs before anything that can fail or block. On a
        // hit, the profile is consulted best-effort only to localize the
        // emergency number.
        let check = check_for_emergency(&query.text);
        if check.is_emergency {
            let profile = self.load_profile(&query.user_id).await;
            return match profile.location.as_ref() {
                Some(loc) => StageOutcome::Emergency(check_for_emergency_in(&query.text, &loc.country)),
                None => StageOutcome::Emergency(check),
            };
        }

        let profile = self.load_profile(&query.user_id).await;

        let sanitized = match sanitize_query(&query.text) {
            Ok(s) => s,
            Err(e) => {
                // Sanitization is part of the safety surface: fail closed.
                warn!(error = %e, "Input sanitization failed; failing closed");
                return StageOutcome::Blocked(SafetyValidationResult::fail_closed());
            }
        };
        if sanitized.was_modified {
            info!(
                modifications = sanitized.modifications.len(),
                "Input sanitized before validation"
            );
        }
        let mut clean_query = query.clone();
        clean_query.text = sanitized.text;

        let mut context = self.context_builder.build(&clean_query, &profile);

        let safety = self.guardrail.validate_query(&clean_query, &profile).await;
        if !safety.is_safe {
            return StageOutcome::Blocked(safety);
        }

        let (country_info, location_aware) = self.load_location(&profile).await;
        context.prompt.push_str(&regional_note(&country_info));

        let options = GenerationOptions::from(&self.config);
        let text = match self
            .model
            .generate(SYSTEM_PROMPT, &context.prompt, &options)
            .await
        {
            Ok(text) => text,
            Err(err) => return StageOutcome::Failed(err),
        };

        // Post-generation filter: interactions against the user's own
        // medications, then user-agnostic contraindication mentions. These
        // annotate but never block.
        let mut interaction_warnings: Vec<String> = self
            .interactions
            .check_interactions(&text, &profile.medications)
            .await
            .iter()
            .map(|i| i.warning_message())
            .collect();
        interaction_warnings.extend(scan_contraindications(&text));

        StageOutcome::Completed {
            text,
            safety,
            interaction_warnings,
            profile,
            location_aware,
        }
    }

    /// Profile loading is convenience data: any failure degrades to an
    /// empty profile.
    async fn load_profile(&self, user_id: &str) -> UserMedicalProfile {
        match self.profiles.load(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserMedicalProfile::empty(),
            Err(e) => {
                warn!(error = %e, "Profile load failed; continuing without profile");
                UserMedicalProfile::empty()
            }
        }
    }

    async fn load_location(&self, profile: &UserMedicalProfile) -> (CountryMedicalInfo, bool) {
        let Some(location) = profile.location.as_ref() else {
            return (CountryMedicalInfo::default_context(), false);
        };
        match self
            .locations
            .country_info(&location.country, location.city.as_deref())
            .await
        {
            Ok(info) => (info, true),
            Err(e) => {
                warn!(error = %e, country = %location.country, "Location lookup failed; using default context");
                (CountryMedicalInfo::default_context(), false)
            }
        }
    }

}

/// Regional context appended to every generation prompt. The default
/// context substitutes when the profile has no location or lookup failed,
/// so the model always sees an emergency number to cite.
fn regional_note(info: &CountryMedicalInfo) -> String {
    let mut note = format!(
        "\n\nRegional note: emergency number {}. {}",
        info.emergency_number, info.healthcare_system_info
    );
    if !info.common_diseases.is_empty() {
        note.push_str(&format!(
            "\nCommon regional conditions: {}.",
            info.common_diseases.join(", ")
        ));
    }
    if !info.drug_regulations.is_empty() {
        note.push_str(&format!(
            "\nMedication regulations: {}",
            info.drug_regulations.join(" ")
        ));
    }
    if !info.vaccination_requirements.is_empty() {
        note.push_str(&format!(
            "\nVaccination notes: {}.",
            info.vaccination_requirements.join(", ")
        ));
    }
    if !info.climate_considerations.is_empty() {
        note.push_str(&format!(
            "\nClimate considerations: {}.",
            info.climate_considerations.join(", ")
        ));
    }
    note
}

fn success_response(
    query: &MedicalQuery,
    text: String,
    safety: SafetyValidationResult,
    interaction_warnings: Vec<String>,
    profile: &UserMedicalProfile,
    location_aware: bool,
    metadata: ResponseMetadata,
) -> MedicalResponse {
    // Interaction and contraindication warnings go into the response text
    // itself, not just the structured field: a transport that renders only
    // the text must still show them.
    let mut text = text;
    if !interaction_warnings.is_empty() {
        text.push_str("\n\nIMPORTANT SAFETY WARNINGS:");
        for warning in &interaction_warnings {
            text.push_str(&format!("\n- {warning}"));
        }
    }

    let mut warnings = safety.warnings;
    warnings.extend(interaction_warnings);

    let confidence = {
        let mut c = 0.8_f32;
        c += 0.1; // safety validation passed on this path
        if location_aware {
            c += 0.05;
        }
        c.min(0.95)
    };

    MedicalResponse {
        response: text,
        response_type: classify_response_type(&query.text),
        confidence,
        safety_warnings: warnings,
        recommendations: build_recommendations(profile, safety.requires_professional_review),
        disclaimer: build_disclaimer(profile),
        metadata,
    }
}

fn emergency_response(check: &EmergencyCheckResult, metadata: ResponseMetadata) -> MedicalResponse {
    let number_line = match check.emergency_number.as_deref() {
        Some(number) => format!("Call {number} now."),
        None => "Call your local emergency number now.".to_string(),
    };
    let condition = check.condition.as_deref().unwrap_or("a medical emergency");
    let action = check
        .required_action
        .as_deref()
        .unwrap_or("Seek emergency medical care immediately");

    let response = format!(
        "EMERGENCY: Your message suggests {condition}. {number_line}\n\n{action}.\n\n\
         Do not wait for an online answer. If you cannot call, ask someone \
         nearby to call for you or get you to the nearest emergency department."
    );

    let mut warnings = vec![format!("EMERGENCY: {condition}")];
    if !check.trigger_keywords.is_empty() {
        warnings.push(format!("Detected: {}", check.trigger_keywords.join(", ")));
    }

    MedicalResponse {
        response,
        response_type: ResponseType::Emergency,
        confidence: 1.0,
        safety_warnings: warnings,
        recommendations: vec![
            number_line,
            "Stay with the affected person until help arrives.".to_string(),
        ],
        disclaimer: "This is an automated emergency notice, not a diagnosis.".to_string(),
        metadata,
    }
}

fn blocked_response(safety: &SafetyValidationResult, metadata: ResponseMetadata) -> MedicalResponse {
    let response = safety
        .reason
        .clone()
        .unwrap_or_else(|| "This question cannot be answered here.".to_string());

    let response_type = if safety.requires_professional_review {
        ResponseType::Referral
    } else {
        ResponseType::GeneralInfo
    };

    MedicalResponse {
        response,
        response_type,
        confidence: 0.0,
        safety_warnings: safety.warnings.clone(),
        recommendations: vec![
            "Speak with a licensed healthcare professional about this question.".to_string(),
        ],
        disclaimer: "This service provides general health information only.".to_string(),
        metadata,
    }
}

fn error_response(metadata: ResponseMetadata) -> MedicalResponse {
    MedicalResponse {
        response: "Sorry, something went wrong while preparing your answer. \
                   Please try again in a moment. If this is urgent, contact a \
                   healthcare professional directly."
            .to_string(),
        response_type: ResponseType::GeneralInfo,
        confidence: 0.0,
        safety_warnings: Vec::new(),
        recommendations: vec![
            "Try again shortly.".to_string(),
            "For urgent concerns, contact a healthcare professional.".to_string(),
        ],
        disclaimer: "This service provides general health information only.".to_string(),
        metadata,
    }
}

static SYMPTOM_KEYWORDS: &[&str] = &[
    "symptom", "pain", "ache", "fever", "hurts", "feeling", "i feel", "nausea", "dizzy",
];
static DRUG_KEYWORDS: &[&str] = &[
    "medication", "medicine", "drug", "pill", "tablet", "dose", "dosage", "side effect",
];
static REFERRAL_KEYWORDS: &[&str] = &[
    "specialist", "which doctor", "see a doctor", "referral", "second opinion",
];

/// Fixed-order keyword classification over the original query text. First
/// matching category wins.
fn classify_response_type(query_text: &str) -> ResponseType {
    let lower = query_text.to_lowercase();
    if SYMPTOM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ResponseType::SymptomAnalysis
    } else if DRUG_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ResponseType::DrugInfo
    } else if REFERRAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ResponseType::Referral
    } else {
        ResponseType::GeneralInfo
    }
}

fn build_recommendations(profile: &UserMedicalProfile, needs_review: bool) -> Vec<String> {
    let mut recs = vec![
        "Consult a healthcare professional for personal medical advice.".to_string(),
        "Seek immediate care if symptoms worsen suddenly.".to_string(),
    ];
    if needs_review {
        recs.push("This topic should be reviewed with a doctor or pharmacist.".to_string());
    }
    if !profile.conditions.is_empty() {
        recs.push(format!(
            "Mention your existing conditions ({}) when speaking with a provider.",
            profile.conditions.join(", ")
        ));
    }
    if profile.has_medications() {
        recs.push(
            "Check with a pharmacist before combining anything new with your current medications."
                .to_string(),
        );
    }
    recs
}

fn build_disclaimer(profile: &UserMedicalProfile) -> String {
    let mut disclaimer = String::from(
        "This information is educational and not a substitute for professional \
         medical advice, diagnosis, or treatment.",
    );
    if let Some(location) = &profile.location {
        disclaimer.push_str(&format!(
            " Guidance and availability of care vary by region; verify locally ({}).",
            location.country
        ));
    }
    if !profile.conditions.is_empty() || !profile.allergies.is_empty() {
        disclaimer.push_str(
            " Your recorded conditions and allergies were considered, but only a \
             clinician who can examine you can give individual advice.",
        );
    }
    disclaimer
}
