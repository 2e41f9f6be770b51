//! Input sanitization applied before the query reaches prompt construction.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::MAX_QUERY_LENGTH;

use super::types::{InputModification, InputModificationKind, SafetyError, SanitizedInput};

/// Phrases that try to redirect the model away from its instructions.
static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)ignore\s+(?:all\s+)?(?:previous|prior|above)\s+instructions?")
            .expect("invalid injection pattern"),
        Regex::new(r"(?i)^\s*system\s*:").expect("invalid injection pattern"),
        Regex::new(r"(?im)^\s*(?:assistant|user)\s*:").expect("invalid injection pattern"),
        Regex::new(r"(?i)you\s+are\s+now\s+(?:a|an|in)\b").expect("invalid injection pattern"),
        Regex::new(r"(?i)disregard\s+(?:your|the)\s+(?:rules|guidelines|safety)")
            .expect("invalid injection pattern"),
    ]
});

/// Clean a raw query before prompt construction.
pub fn sanitize_query(raw_query: &str) -> Result<SanitizedInput, SafetyError> {
    sanitize_with_limit(raw_query, MAX_QUERY_LENGTH)
}

pub fn sanitize_with_limit(
    raw_query: &str,
    max_length: usize,
) -> Result<SanitizedInput, SafetyError> {
    let mut text = raw_query.to_string();
    let mut modifications = Vec::new();

    let before = text.clone();
    text = remove_invisible_unicode(&text);
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::InvisibleUnicodeRemoved,
            description: "Stripped non-visible Unicode characters".to_string(),
        });
    }

    let before = text.clone();
    text = remove_control_characters(&text);
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::ControlCharacterRemoved,
            description: "Stripped control characters".to_string(),
        });
    }

    let before = text.clone();
    for pattern in INJECTION_PATTERNS.iter() {
        text = pattern.replace_all(&text, "[FILTERED]").into_owned();
    }
    if text != before {
        modifications.push(InputModification {
            kind: InputModificationKind::InjectionPatternRemoved,
            description: "Removed potential prompt injection patterns".to_string(),
        });
    }

    if text.chars().count() > max_length {
        let original_len = text.chars().count();
        text = truncate_at_word_boundary(&text, max_length);
        modifications.push(InputModification {
            kind: InputModificationKind::ExcessiveLengthTruncated,
            description: format!(
                "Truncated from {} to {} characters",
                original_len,
                text.chars().count()
            ),
        });
    }

    let was_modified = !modifications.is_empty();

    Ok(SanitizedInput {
        text,
        was_modified,
        modifications,
    })
}

/// Remove zero-width and invisible Unicode characters.
fn remove_invisible_unicode(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}'..='\u{200F}'  // Zero-width chars
                | '\u{202A}'..='\u{202E}' // Directional formatting
                | '\u{2060}'..='\u{2064}' // Invisible operators
                | '\u{2066}'..='\u{2069}' // Directional isolates
                | '\u{FEFF}'              // BOM
                | '\u{00AD}'              // Soft hyphen
            )
        })
        .collect()
}

/// Remove control characters except newline and tab.
fn remove_control_characters(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// Truncate to at most `max_chars`, backing up to the last space when one
/// exists in the kept range.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let kept: String = text.chars().take(max_chars).collect();
    match kept.rfind(' ') {
        Some(idx) if idx > max_chars / 2 => kept[..idx].to_string(),
        _ => kept,
    }
}
