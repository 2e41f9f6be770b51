//! Best-effort audit trail for safety decisions. Sink failures are always
//! swallowed by the guardrail; auditing never changes a validation result.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AUDIT_EXCERPT_LEN;

use super::types::{SafetyError, SafetyValidationResult};

/// One validation decision, with the query truncated so the audit log never
/// stores unbounded patient text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub validation_id: Uuid,
    pub query_excerpt: String,
    pub is_safe: bool,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(query: &str, result: &SafetyValidationResult) -> Self {
        Self {
            validation_id: Uuid::new_v4(),
            query_excerpt: truncate_chars(query, AUDIT_EXCERPT_LEN),
            is_safe: result.is_safe,
            reason: result.reason.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), SafetyError>;
}

/// Default sink: structured log events only. External persistence is a
/// collaborator concern.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), SafetyError> {
        tracing::info!(
            validation_id = %entry.validation_id,
            is_safe = entry.is_safe,
            reason = entry.reason.as_deref().unwrap_or(""),
            "Safety validation audited"
        );
        Ok(())
    }
}
