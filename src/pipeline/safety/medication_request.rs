//! Medication-request detection. Unlike the restricted-topic check this is
//! not a hard block: asking about a prescription-only medicine only flags
//! the response for professional review.

use std::sync::LazyLock;

use regex::Regex;

/// Phrasings that name a requested medication in the first capture group.
/// The `prescription for X` phrasing is checked first: the looser patterns
/// below would otherwise capture the word "prescription" itself.
static MEDICATION_REQUEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bprescription\s+(?:for|of)\s+([a-z][a-z-]{2,})")
            .expect("invalid medication request pattern"),
        Regex::new(r"(?i)\b(?:can|could|should)\s+i\s+(?:take|get|use|start)\s+(?:some\s+)?([a-z][a-z-]{2,})")
            .expect("invalid medication request pattern"),
        Regex::new(r"(?i)\bi\s+(?:need|want)\s+(?:some\s+|a\s+)?([a-z][a-z-]{2,})")
            .expect("invalid medication request pattern"),
    ]
});

/// Capture-group hits that are request vocabulary, not medication names.
static NON_MEDICATION_WORDS: &[&str] = &[
    "prescription",
    "medication",
    "medicine",
    "something",
    "drug",
    "drugs",
    "pill",
    "pills",
];

/// Generic names and brand names that are prescription-only in most
/// jurisdictions, grouped loosely by class.
static PRESCRIPTION_ONLY: &[&str] = &[
    // opioids
    "oxycodone",
    "hydrocodone",
    "morphine",
    "fentanyl",
    "codeine",
    "tramadol",
    // benzodiazepines
    "diazepam",
    "valium",
    "alprazolam",
    "xanax",
    "lorazepam",
    "clonazepam",
    // stimulants
    "adderall",
    "ritalin",
    "methylphenidate",
    "amphetamine",
    // antibiotics
    "amoxicillin",
    "azithromycin",
    "ciprofloxacin",
    "doxycycline",
    // other
    "isotretinoin",
    "warfarin",
    "insulin",
    "prednisone",
];

/// Extract a requested medication name from the query, when present, and
/// report whether it is prescription-only.
pub fn detect_medication_request(query_lower: &str) -> Option<MedicationRequest> {
    for pattern in MEDICATION_REQUEST_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(query_lower) {
            let name = caps.get(1)?.as_str().to_string();
            if NON_MEDICATION_WORDS.contains(&name.as_str()) {
                continue;
            }
            let prescription_only = PRESCRIPTION_ONLY.contains(&name.as_str());
            return Some(MedicationRequest {
                medication: name,
                prescription_only,
            });
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationRequest {
    pub medication: String,
    pub prescription_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_requested_medication() {
        let req = detect_medication_request("can i take amoxicillin for a sore throat").unwrap();
        assert_eq!(req.medication, "amoxicillin");
        assert!(req.prescription_only);
    }

    #[test]
    fn otc_request_is_not_prescription_only() {
        let req = detect_medication_request("should i take ibuprofen for this").unwrap();
        assert_eq!(req.medication, "ibuprofen");
        assert!(!req.prescription_only);
    }

    #[test]
    fn prescription_for_phrasing_matches() {
        let req = detect_medication_request("do i need a prescription for tramadol").unwrap();
        assert_eq!(req.medication, "tramadol");
        assert!(req.prescription_only);
    }

    #[test]
    fn prescription_for_wins_over_looser_phrasings() {
        // "i need ..." also matches here; the specific pattern must be
        // consulted first so the drug name, not "prescription", is captured.
        let req = detect_medication_request("i need a prescription for oxycodone").unwrap();
        assert_eq!(req.medication, "oxycodone");
        assert!(req.prescription_only);
    }

    #[test]
    fn request_vocabulary_is_not_a_medication_name() {
        assert!(detect_medication_request("i need a prescription").is_none());
        assert!(detect_medication_request("can i get some medicine").is_none());
    }

    #[test]
    fn no_request_in_general_question() {
        assert!(detect_medication_request("what is a healthy breakfast").is_none());
        assert!(detect_medication_request("why do i feel tired in the morning").is_none());
    }
}
