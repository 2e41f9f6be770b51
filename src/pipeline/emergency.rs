//! Emergency detection: the first and highest-priority stage.
//!
//! A pure keyword/pattern scan tuned for recall over precision. A missed
//! emergency is the only unacceptable failure mode, so this is a
//! conservative trigger, not a diagnostic classifier.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::location::emergency_number_for;

/// Outcome of the emergency scan. `trigger_keywords` holds every distinct
/// matching phrase; `condition`/`required_action` come from the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyCheckResult {
    pub is_emergency: bool,
    pub condition: Option<String>,
    pub trigger_keywords: Vec<String>,
    pub required_action: Option<String>,
    pub emergency_number: Option<String>,
    pub country_code: Option<String>,
}

impl EmergencyCheckResult {
    fn negative() -> Self {
        Self {
            is_emergency: false,
            condition: None,
            trigger_keywords: Vec::new(),
            required_action: None,
            emergency_number: None,
            country_code: None,
        }
    }
}

/// A configured trigger phrase with its human-readable interpretation.
struct EmergencyKeyword {
    phrase: &'static str,
    condition: &'static str,
    action: &'static str,
}

const fn kw(
    phrase: &'static str,
    condition: &'static str,
    action: &'static str,
) -> EmergencyKeyword {
    EmergencyKeyword {
        phrase,
        condition,
        action,
    }
}

/// Severity-critical phrases. Any single hit is an emergency.
static EMERGENCY_KEYWORDS: &[EmergencyKeyword] = &[
    kw(
        "heart attack",
        "Suspected heart attack",
        "Call emergency services now",
    ),
    kw("stroke", "Suspected stroke", "Call emergency services now"),
    kw(
        "can't breathe",
        "Severe breathing difficulty",
        "Call emergency services now",
    ),
    kw(
        "cannot breathe",
        "Severe breathing difficulty",
        "Call emergency services now",
    ),
    kw(
        "not breathing",
        "Respiratory arrest",
        "Call emergency services now and start CPR if trained",
    ),
    kw("choking", "Airway obstruction", "Call emergency services now"),
    kw(
        "anaphylaxis",
        "Severe allergic reaction",
        "Use an epinephrine auto-injector if available and call emergency services",
    ),
    kw(
        "severe allergic reaction",
        "Severe allergic reaction",
        "Use an epinephrine auto-injector if available and call emergency services",
    ),
    kw(
        "unconscious",
        "Loss of consciousness",
        "Call emergency services now",
    ),
    kw(
        "unresponsive",
        "Loss of consciousness",
        "Call emergency services now",
    ),
    kw("seizure", "Active seizure", "Call emergency services now"),
    kw("convulsion", "Active seizure", "Call emergency services now"),
    kw(
        "severe bleeding",
        "Major hemorrhage",
        "Apply firm pressure and call emergency services now",
    ),
    kw(
        "bleeding heavily",
        "Major hemorrhage",
        "Apply firm pressure and call emergency services now",
    ),
    kw(
        "overdose",
        "Suspected overdose",
        "Call emergency services or poison control now",
    ),
    kw(
        "poisoning",
        "Suspected poisoning",
        "Call emergency services or poison control now",
    ),
];

/// Red-flag symptoms. Lower default severity than the critical set but still
/// routed through the emergency path.
static RED_FLAG_SYMPTOMS: &[EmergencyKeyword] = &[
    kw(
        "chest pain",
        "Possible cardiac symptom",
        "Seek urgent medical care",
    ),
    kw(
        "shortness of breath",
        "Breathing difficulty",
        "Seek urgent medical care",
    ),
    kw(
        "sudden numbness",
        "Possible stroke symptom",
        "Seek urgent medical care",
    ),
    kw(
        "slurred speech",
        "Possible stroke symptom",
        "Seek urgent medical care",
    ),
    kw(
        "worst headache",
        "Severe sudden headache",
        "Seek urgent medical care",
    ),
    kw(
        "coughing blood",
        "Hemoptysis",
        "Seek urgent medical care",
    ),
    kw(
        "coughing up blood",
        "Hemoptysis",
        "Seek urgent medical care",
    ),
    kw(
        "vomiting blood",
        "Gastrointestinal bleeding",
        "Seek urgent medical care",
    ),
    kw(
        "sudden vision loss",
        "Acute vision loss",
        "Seek urgent medical care",
    ),
    kw(
        "severe abdominal pain",
        "Acute abdominal pain",
        "Seek urgent medical care",
    ),
];

/// Combined-symptom patterns. Each captures a known dangerous pairing that
/// the single-phrase lists would miss when worded loosely.
static COMBINED_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(
                r"(?i)chest\s+(?:pain|tightness|pressure)[\s\S]{0,160}(?:short(?:ness)?\s+of\s+breath|hard\s+to\s+breathe|sweat|left\s+arm)|(?:short(?:ness)?\s+of\s+breath|hard\s+to\s+breathe)[\s\S]{0,160}chest\s+(?:pain|tightness|pressure)",
            )
            .expect("invalid combined cardiac pattern"),
            "Possible heart attack (chest pain with associated symptoms)",
        ),
        (
            Regex::new(
                r"(?i)(?:face\s+droop|numb(?:ness)?)[\s\S]{0,160}(?:speech|speak)|(?:slurred\s+speech|trouble\s+speaking)[\s\S]{0,160}(?:numb|weak)",
            )
            .expect("invalid combined stroke pattern"),
            "Possible stroke (numbness with speech difficulty)",
        ),
        (
            Regex::new(
                r"(?i)(?:severe|worst|sudden)\s+headache[\s\S]{0,160}(?:vision|confus|vomit|stiff\s+neck)",
            )
            .expect("invalid combined headache pattern"),
            "Severe headache with neurological symptoms",
        ),
    ]
});

/// Subset of red-flag phrases that become an emergency when two distinct
/// ones appear together, in any order.
static COMBINABLE_SYMPTOMS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "sweating",
    "dizziness",
    "fainting",
    "numbness",
    "confusion",
];

/// Cross-product of COMBINABLE_SYMPTOMS: any two phrases within range of
/// each other. Matching alone is not enough; callers also require two
/// distinct phrases to be present.
static CROSS_PRODUCT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = COMBINABLE_SYMPTOMS
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)\b(?:{alternation})\b[\s\S]{{0,200}}\b(?:{alternation})\b"
    ))
    .expect("invalid cross-product pattern")
});

/// Scan a query for life-threatening content. Pure function over the query
/// text and the static configuration tables; no side effects.
pub fn check_for_emergency(query: &str) -> EmergencyCheckResult {
    let lower = query.to_lowercase();
    let mut result = EmergencyCheckResult::negative();

    for table in [EMERGENCY_KEYWORDS, RED_FLAG_SYMPTOMS] {
        for entry in table {
            if lower.contains(entry.phrase) {
                if !result.is_emergency {
                    result.is_emergency = true;
                    result.condition = Some(entry.condition.to_string());
                    result.required_action = Some(entry.action.to_string());
                }
                push_distinct(&mut result.trigger_keywords, entry.phrase);
            }
        }
    }

    for (pattern, condition) in COMBINED_PATTERNS.iter() {
        if pattern.is_match(&lower) {
            if !result.is_emergency {
                result.is_emergency = true;
                result.condition = Some(condition.to_string());
                result.required_action = Some("Call emergency services now".to_string());
            }
            break;
        }
    }

    if !result.is_emergency && CROSS_PRODUCT_PATTERN.is_match(&lower) {
        let present: Vec<&str> = COMBINABLE_SYMPTOMS
            .iter()
            .copied()
            .filter(|phrase| lower.contains(phrase))
            .collect();
        if present.len() >= 2 {
            result.is_emergency = true;
            result.condition = Some("Multiple concerning symptoms reported together".to_string());
            result.required_action = Some("Seek urgent medical care".to_string());
            for phrase in present {
                push_distinct(&mut result.trigger_keywords, phrase);
            }
        }
    }

    if result.is_emergency {
        tracing::warn!(
            condition = result.condition.as_deref().unwrap_or("unknown"),
            trigger_count = result.trigger_keywords.len(),
            "Emergency detected in query"
        );
    }

    result
}

/// Emergency scan enriched with the caller's country, when already known,
/// so the response can name the right number to call.
pub fn check_for_emergency_in(query: &str, country_code: &str) -> EmergencyCheckResult {
    let mut result = check_for_emergency(query);
    if result.is_emergency {
        result.emergency_number = Some(emergency_number_for(country_code).to_string());
        result.country_code = Some(country_code.to_uppercase());
    }
    result
}

fn push_distinct(keywords: &mut Vec<String>, phrase: &str) {
    if !keywords.iter().any(|k| k == phrase) {
        keywords.push(phrase.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =================================================================
    // CRITICAL KEYWORDS
    // =================================================================

    #[test]
    fn every_emergency_keyword_triggers() {
        for entry in EMERGENCY_KEYWORDS {
            let query = format!("I think this might be {}", entry.phrase);
            let result = check_for_emergency(&query);
            assert!(result.is_emergency, "keyword should trigger: {}", entry.phrase);
            assert!(
                result.trigger_keywords.contains(&entry.phrase.to_string()),
                "trigger_keywords missing: {}",
                entry.phrase
            );
        }
    }

    #[test]
    fn heart_attack_is_case_insensitive() {
        let result = check_for_emergency("I Think I'm Having A HEART ATTACK");
        assert!(result.is_emergency);
        assert_eq!(result.condition.as_deref(), Some("Suspected heart attack"));
        assert!(result.trigger_keywords.contains(&"heart attack".to_string()));
    }

    #[test]
    fn first_match_supplies_condition_and_action() {
        let result = check_for_emergency("heart attack and then a seizure");
        assert_eq!(result.condition.as_deref(), Some("Suspected heart attack"));
        assert_eq!(
            result.required_action.as_deref(),
            Some("Call emergency services now")
        );
        assert!(result.trigger_keywords.contains(&"seizure".to_string()));
    }

    #[test]
    fn trigger_keywords_are_deduped() {
        let result = check_for_emergency("stroke stroke stroke");
        assert_eq!(result.trigger_keywords, vec!["stroke".to_string()]);
    }

    // =================================================================
    // RED-FLAG SYMPTOMS
    // =================================================================

    #[test]
    fn red_flag_chest_pain_triggers() {
        let result = check_for_emergency("I have chest pain");
        assert!(result.is_emergency);
        assert_eq!(result.condition.as_deref(), Some("Possible cardiac symptom"));
        assert_eq!(result.required_action.as_deref(), Some("Seek urgent medical care"));
    }

    #[test]
    fn red_flag_vomiting_blood_triggers() {
        let result = check_for_emergency("my friend started vomiting blood an hour ago");
        assert!(result.is_emergency);
        assert!(result.trigger_keywords.contains(&"vomiting blood".to_string()));
    }

    // =================================================================
    // COMBINED PATTERNS
    // =================================================================

    #[test]
    fn chest_tightness_with_breathing_difficulty_matches_combined_pattern() {
        // "chest tightness" is not in either keyword list on its own
        let result = check_for_emergency("sudden chest tightness and it's hard to breathe");
        assert!(result.is_emergency);
        assert!(result
            .condition
            .unwrap()
            .contains("chest pain with associated symptoms"));
    }

    #[test]
    fn numbness_with_speech_trouble_matches_stroke_pattern() {
        let result = check_for_emergency("my arm went numb and now I have trouble speaking");
        assert!(result.is_emergency);
    }

    #[test]
    fn cross_product_requires_two_distinct_symptoms() {
        let result = check_for_emergency("dizziness, dizziness, so much dizziness");
        assert!(!result.is_emergency);

        let result = check_for_emergency("a lot of sweating and then fainting this morning");
        assert!(result.is_emergency);
        assert!(result.trigger_keywords.contains(&"sweating".to_string()));
        assert!(result.trigger_keywords.contains(&"fainting".to_string()));
    }

    // =================================================================
    // NEGATIVE CASES
    // =================================================================

    #[test]
    fn benign_queries_do_not_trigger() {
        for query in [
            "What's a healthy breakfast?",
            "How much water should I drink daily?",
            "Can I take vitamin D with calcium?",
            "What does my blood test measure?",
        ] {
            let result = check_for_emergency(query);
            assert!(!result.is_emergency, "false positive on: {query}");
            assert!(result.trigger_keywords.is_empty());
            assert!(result.condition.is_none());
        }
    }

    #[test]
    fn negative_result_carries_no_action() {
        let result = check_for_emergency("tell me about sleep hygiene");
        assert!(result.required_action.is_none());
        assert!(result.emergency_number.is_none());
    }

    // =================================================================
    // COUNTRY ENRICHMENT
    // =================================================================

    #[test]
    fn country_enrichment_sets_emergency_number() {
        let result = check_for_emergency_in("I think I'm having a heart attack", "gb");
        assert!(result.is_emergency);
        assert_eq!(result.emergency_number.as_deref(), Some("999"));
        assert_eq!(result.country_code.as_deref(), Some("GB"));
    }

    #[test]
    fn country_enrichment_skipped_for_negative_result() {
        let result = check_for_emergency_in("what is a balanced diet?", "US");
        assert!(!result.is_emergency);
        assert!(result.emergency_number.is_none());
        assert!(result.country_code.is_none());
    }
}
