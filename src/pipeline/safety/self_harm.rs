//! Self-harm detection. A hit forces `is_safe = false` at high escalation
//! with professional review, never answered by the model.

static SELF_HARM_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "take my own life",
    "don't want to live",
    "do not want to live",
    "self harm",
    "self-harm",
    "hurt myself",
    "hurting myself",
    "cutting myself",
    "cut myself",
    "overdose on purpose",
    "violent thoughts",
    "hurt someone",
    "hurting someone",
];

/// Returns the first matching keyword, if any.
pub fn detect_self_harm(query_lower: &str) -> Option<&'static str> {
    SELF_HARM_KEYWORDS
        .iter()
        .find(|kw| query_lower.contains(*kw))
        .copied()
}

/// The support message used in place of a generated answer.
pub fn support_message() -> String {
    "It sounds like you may be going through something serious. Please reach out to a \
     mental health professional or a crisis line right away. You don't have to handle \
     this alone. If you are in immediate danger, contact your local emergency services."
        .to_string()
}
