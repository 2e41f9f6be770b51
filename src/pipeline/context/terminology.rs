//! Medical terminology and condition inference over the raw query text.

/// Jargon → plain-language gloss. Hits are surfaced to the model so the
/// answer can explain rather than assume.
static JARGON_MAP: &[(&str, &str)] = &[
    ("hypertension", "high blood pressure"),
    ("hypotension", "low blood pressure"),
    ("myocardial infarction", "heart attack"),
    ("cerebrovascular accident", "stroke"),
    ("hyperglycemia", "high blood sugar"),
    ("hypoglycemia", "low blood sugar"),
    ("dyspnea", "shortness of breath"),
    ("tachycardia", "fast heart rate"),
    ("bradycardia", "slow heart rate"),
    ("pruritus", "itching"),
    ("edema", "swelling"),
    ("pyrexia", "fever"),
    ("emesis", "vomiting"),
    ("syncope", "fainting"),
    ("arthralgia", "joint pain"),
    ("myalgia", "muscle pain"),
];

/// Symptom clusters. A condition is only suggested when at least two of its
/// symptoms appear; one shared symptom proves nothing.
static SYMPTOM_PATTERNS: &[(&str, &[&str])] = &[
    (
        "migraine",
        &["headache", "nausea", "light sensitivity", "aura", "throbbing"],
    ),
    (
        "influenza",
        &["fever", "body aches", "chills", "fatigue", "cough", "sore throat"],
    ),
    (
        "gastroenteritis",
        &["diarrhea", "vomiting", "stomach cramps", "nausea"],
    ),
    (
        "anemia",
        &["fatigue", "pale skin", "dizziness", "shortness of breath", "cold hands"],
    ),
    (
        "urinary tract infection",
        &["burning urination", "frequent urination", "pelvic pain", "cloudy urine"],
    ),
    (
        "allergic rhinitis",
        &["sneezing", "runny nose", "itchy eyes", "congestion"],
    ),
];

/// Jargon terms found in the query, formatted as "term (plain gloss)".
pub fn extract_terminology(query_lower: &str) -> Vec<String> {
    JARGON_MAP
        .iter()
        .filter(|(term, _)| query_lower.contains(term))
        .map(|(term, plain)| format!("{term} ({plain})"))
        .collect()
}

/// Heuristic condition inference: symptom clusters with >= 2 distinct hits,
/// plus any of the user's own recorded conditions mentioned in the query.
pub fn infer_conditions(query_lower: &str, user_conditions: &[String]) -> Vec<String> {
    let mut conditions: Vec<String> = Vec::new();

    for (condition, symptoms) in SYMPTOM_PATTERNS {
        let hits = symptoms
            .iter()
            .filter(|s| query_lower.contains(*s))
            .count();
        if hits >= 2 {
            conditions.push(condition.to_string());
        }
    }

    for condition in user_conditions {
        let lower = condition.to_lowercase();
        if query_lower.contains(&lower) && !conditions.iter().any(|c| c == &lower) {
            conditions.push(lower);
        }
    }

    conditions
}
