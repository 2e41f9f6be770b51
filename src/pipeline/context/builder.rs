//! Prompt assembly: enrich the raw query with profile data, detected
//! drugs/conditions, and per-profile safety notes before generation.
//!
//! Context building is convenience, not safety. Any failure degrades to the
//! raw query text so the pipeline keeps moving.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::models::{MedicalQuery, UserMedicalProfile};
use crate::pipeline::interactions::aliases::extract_drug_mentions;

use super::terminology::{extract_terminology, infer_conditions};

/// Phrasings that carry a drug name in a capture group.
static DRUG_PHRASINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\btak(?:e|ing)\s+([a-z][a-z\-]{2,})\s+for\b")
            .expect("invalid drug phrasing pattern"),
        Regex::new(r"(?i)\bprescribed\s+([a-z][a-z\-]{2,})\s+for\b")
            .expect("invalid drug phrasing pattern"),
        Regex::new(r"(?i)\bside effects? of\s+([a-z][a-z\-]{2,})\b")
            .expect("invalid drug phrasing pattern"),
    ]
});

/// Everything the builder extracted, alongside the final prompt.
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub prompt: String,
    pub safety_notes: Vec<String>,
    pub detected_drugs: Vec<String>,
    pub detected_conditions: Vec<String>,
    pub terminology: Vec<String>,
}

impl BuiltContext {
    /// Fallback when assembly fails: the query text alone, nothing detected.
    fn raw(query: &MedicalQuery) -> Self {
        Self {
            prompt: query.text.clone(),
            safety_notes: Vec::new(),
            detected_drugs: Vec::new(),
            detected_conditions: Vec::new(),
            terminology: Vec::new(),
        }
    }
}

pub struct MedicalContextBuilder;

impl MedicalContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the enriched prompt. Never fails: on any internal error the
    /// raw query text is used instead.
    pub fn build(&self, query: &MedicalQuery, profile: &UserMedicalProfile) -> BuiltContext {
        match assemble(query, profile) {
            Ok(built) => built,
            Err(err) => {
                warn!(error = %err, "context assembly failed, using raw query");
                BuiltContext::raw(query)
            }
        }
    }
}

impl Default for MedicalContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn assemble(
    query: &MedicalQuery,
    profile: &UserMedicalProfile,
) -> Result<BuiltContext, serde_json::Error> {
    let lower = query.text.to_lowercase();

    let detected_drugs = detect_drugs(&lower);
    let detected_conditions = infer_conditions(&lower, &profile.conditions);
    let terminology = extract_terminology(&lower);
    let safety_notes = safety_notes(&lower, profile, &detected_drugs);

    let mut prompt = String::with_capacity(query.text.len() + 1024);

    prompt.push_str("<PATIENT_PROFILE>\n");
    if let Some(age) = profile.age {
        prompt.push_str(&format!("Age: {age}\n"));
    }
    if let Some(gender) = &profile.gender {
        prompt.push_str(&format!("Gender: {gender}\n"));
    }
    prompt.push_str(&format!("Conditions: {}\n", list_or_none(&profile.conditions)));
    prompt.push_str(&format!("Allergies: {}\n", list_or_none(&profile.allergies)));
    prompt.push_str(&format!(
        "Current medications: {}\n",
        list_or_none(&profile.medications)
    ));
    if let Some(blood_group) = &profile.blood_group {
        prompt.push_str(&format!("Blood group: {blood_group}\n"));
    }
    if let Some(genotype) = &profile.genotype {
        prompt.push_str(&format!("Genotype: {genotype}\n"));
    }
    if let Some(location) = &profile.location {
        match &location.city {
            Some(city) => {
                prompt.push_str(&format!("Location: {}, {}\n", city, location.country))
            }
            None => prompt.push_str(&format!("Location: {}\n", location.country)),
        }
    }
    prompt.push_str("</PATIENT_PROFILE>\n\n");

    if !terminology.is_empty() || !detected_conditions.is_empty() || !detected_drugs.is_empty() {
        prompt.push_str("<DETECTED_CONTEXT>\n");
        if !terminology.is_empty() {
            prompt.push_str(&format!("Medical terms used: {}\n", terminology.join("; ")));
        }
        if !detected_conditions.is_empty() {
            prompt.push_str(&format!(
                "Possibly relevant conditions (heuristic, unconfirmed): {}\n",
                detected_conditions.join(", ")
            ));
        }
        if !detected_drugs.is_empty() {
            prompt.push_str(&format!(
                "Medications mentioned: {}\n",
                detected_drugs.join(", ")
            ));
        }
        prompt.push_str("</DETECTED_CONTEXT>\n\n");
    }

    if let Some(context) = &query.context {
        prompt.push_str("<REPORTED_CONTEXT>\n");
        prompt.push_str(&serde_json::to_string_pretty(context)?);
        prompt.push_str("\n</REPORTED_CONTEXT>\n\n");
    }

    if !safety_notes.is_empty() {
        prompt.push_str("<SAFETY_NOTES>\n");
        for note in &safety_notes {
            prompt.push_str(&format!("- {note}\n"));
        }
        prompt.push_str("</SAFETY_NOTES>\n\n");
    }

    prompt.push_str(&format!("Question: {}\n\n", query.text));
    prompt.push_str(RESPONSE_GUIDELINES);

    Ok(BuiltContext {
        prompt,
        safety_notes,
        detected_drugs,
        detected_conditions,
        terminology,
    })
}

const RESPONSE_GUIDELINES: &str = "\
RESPONSE GUIDELINES:
- Answer in plain language a patient can understand.
- Provide general health information only. Do not diagnose.
- State uncertainty explicitly where the evidence is unclear.
- Account for the patient profile above where relevant.
- Recommend consulting a healthcare professional for personal medical decisions.
- Never suggest stopping or changing prescribed medication without professional advice.";

/// Drug names from phrasing capture groups plus the known-alias scan,
/// deduplicated in order of first appearance.
fn detect_drugs(query_lower: &str) -> Vec<String> {
    let mut drugs: Vec<String> = Vec::new();
    for pattern in DRUG_PHRASINGS.iter() {
        for captures in pattern.captures_iter(query_lower) {
            if let Some(name) = captures.get(1) {
                let name = name.as_str().to_lowercase();
                if !drugs.contains(&name) {
                    drugs.push(name);
                }
            }
        }
    }
    for name in extract_drug_mentions(query_lower) {
        if !drugs.contains(&name) {
            drugs.push(name);
        }
    }
    drugs
}

fn safety_notes(
    query_lower: &str,
    profile: &UserMedicalProfile,
    detected_drugs: &[String],
) -> Vec<String> {
    let mut notes: Vec<String> = Vec::new();

    if let Some(age) = profile.age {
        if age < 18 {
            notes.push(
                "Patient is a minor. Pediatric dosing and guidance differ from adults.".to_string(),
            );
        } else if age > 65 {
            notes.push(
                "Patient is over 65. Consider age-related dosing and interaction sensitivity."
                    .to_string(),
            );
        }
    }

    if query_lower.contains("pregnan") || query_lower.contains("breastfeed") {
        notes.push(
            "Pregnancy or breastfeeding mentioned. Many medications are unsafe in this context."
                .to_string(),
        );
    }

    for condition in &profile.conditions {
        let lower = condition.to_lowercase();
        if lower.contains("kidney") || lower.contains("renal") {
            notes.push(
                "Patient has kidney disease. Renally cleared drugs may need dose adjustment."
                    .to_string(),
            );
        }
        if lower.contains("liver") || lower.contains("hepatic") {
            notes.push(
                "Patient has liver disease. Hepatically metabolized drugs may need caution."
                    .to_string(),
            );
        }
    }

    if !profile.allergies.is_empty() {
        notes.push(format!(
            "Recorded allergies: {}. Check any suggested medication against them.",
            profile.allergies.join(", ")
        ));
    }

    if !profile.medications.is_empty() && !detected_drugs.is_empty() {
        notes.push(format!(
            "Patient takes {} and the question mentions {}. Watch for interactions.",
            profile.medications.join(", "),
            detected_drugs.join(", ")
        ));
    }

    notes
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none recorded".to_string()
    } else {
        items.join(", ")
    }
}
