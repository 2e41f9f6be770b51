//! Restricted-topic and drug-seeking detection: the first hard-block check
//! the guardrail runs.

use std::sync::LazyLock;

use regex::Regex;

/// Topics the service refuses outright, matched as lowercase substrings.
static RESTRICTED_TOPICS: &[&str] = &[
    "without a prescription",
    "without prescription",
    "no prescription",
    "dark web",
    "darkweb",
    "fake prescription",
    "forge a prescription",
    "off-label high",
    "get high on",
    "recreational dose",
    "lethal dose",
];

/// Drug-seeking phrasings. Separate from the topic list because these need
/// word boundaries and optional filler words.
static DRUG_SEEKING_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)\bprescribe\s+me\b").expect("invalid drug-seeking pattern"),
            "Request for a prescription",
        ),
        (
            Regex::new(r"(?i)\bbuy\s+(?:\w+\s+){0,3}online\b").expect("invalid drug-seeking pattern"),
            "Request to purchase medication online",
        ),
        (
            Regex::new(r"(?i)\bwhere\s+(?:can|do)\s+i\s+(?:get|buy|find|order)\s+(?:some\s+)?\w+\b")
                .expect("invalid drug-seeking pattern"),
            "Medication sourcing request",
        ),
        (
            Regex::new(r"(?i)\bhow\s+(?:do|can)\s+i\s+get\s+(?:\w+\s+){0,3}without\b")
                .expect("invalid drug-seeking pattern"),
            "Attempt to bypass prescription requirements",
        ),
        (
            Regex::new(r"(?i)\bhighest\s+dose\s+(?:i|you)\s+can\b")
                .expect("invalid drug-seeking pattern"),
            "Dose maximization request",
        ),
    ]
});

/// Default restricted-drug names used when the external list getter fails.
pub static DEFAULT_RESTRICTED_DRUGS: &[&str] = &[
    "oxycodone",
    "hydrocodone",
    "fentanyl",
    "morphine",
    "codeine",
    "tramadol",
    "alprazolam",
    "xanax",
    "diazepam",
    "valium",
    "lorazepam",
    "adderall",
    "amphetamine",
    "methylphenidate",
    "ritalin",
    "ketamine",
];

/// Scan a query for restricted topics and drug-seeking phrasing. Returns a
/// specific, user-presentable reason on a hit.
pub fn check_restricted(query_lower: &str, restricted_drugs: &[String]) -> Option<String> {
    for topic in RESTRICTED_TOPICS {
        if query_lower.contains(topic) {
            return Some(format!("Query touches a restricted topic: \"{topic}\""));
        }
    }

    for (pattern, label) in DRUG_SEEKING_PATTERNS.iter() {
        if pattern.is_match(query_lower) {
            // Sourcing requests alone are ambiguous; require a restricted
            // drug mention to block.
            if *label == "Medication sourcing request"
                && !mentions_restricted_drug(query_lower, restricted_drugs)
            {
                continue;
            }
            return Some(format!(
                "{label} cannot be handled here; prescriptions require a licensed clinician"
            ));
        }
    }

    None
}

fn mentions_restricted_drug(query_lower: &str, restricted_drugs: &[String]) -> bool {
    restricted_drugs
        .iter()
        .any(|drug| query_lower.contains(drug.as_str()))
}

/// Owned copy of the default restricted-drug list.
pub fn default_restricted_drugs() -> Vec<String> {
    DEFAULT_RESTRICTED_DRUGS
        .iter()
        .map(|d| d.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drugs() -> Vec<String> {
        default_restricted_drugs()
    }

    #[test]
    fn oxycodone_without_prescription_is_blocked() {
        let reason = check_restricted(
            "how do i get oxycodone without a prescription",
            &drugs(),
        );
        assert!(reason.is_some());
    }

    #[test]
    fn prescribe_me_is_blocked() {
        let reason = check_restricted("can you prescribe me antibiotics", &drugs());
        assert!(reason.is_some());
        assert!(reason.unwrap().contains("licensed clinician"));
    }

    #[test]
    fn buy_online_is_blocked() {
        assert!(check_restricted("can i buy tramadol online", &drugs()).is_some());
    }

    #[test]
    fn sourcing_question_without_restricted_drug_passes() {
        // "where can I get" + a benign item is a normal question
        assert!(check_restricted("where can i get vitamin d supplements", &drugs()).is_none());
    }

    #[test]
    fn sourcing_question_with_restricted_drug_is_blocked() {
        assert!(check_restricted("where can i get some xanax", &drugs()).is_some());
    }

    #[test]
    fn benign_medication_question_passes() {
        assert!(check_restricted("what are common side effects of metformin", &drugs()).is_none());
        assert!(check_restricted("should i take ibuprofen with food", &drugs()).is_none());
    }

    #[test]
    fn lethal_dose_topic_is_blocked() {
        assert!(check_restricted("what is the lethal dose of acetaminophen", &drugs()).is_some());
    }
}
