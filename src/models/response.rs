use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The complete answer handed back to the transport layer. Every terminal
/// state of the pipeline produces one of these; callers never see a raw
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalResponse {
    pub response: String,
    pub response_type: ResponseType,
    /// 1.0 for emergency routing, 0.0 for blocked/error, otherwise in
    /// [0, 0.95].
    pub confidence: f32,
    pub safety_warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
    pub metadata: ResponseMetadata,
}

/// Coarse category of the answer, resolved from the original query by a
/// fixed-order keyword rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    GeneralInfo,
    SymptomAnalysis,
    DrugInfo,
    Emergency,
    Referral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub query_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub response_time_ms: u64,
    pub model_used: String,
}

impl ResponseMetadata {
    pub fn new(response_time_ms: u64, model_used: impl Into<String>) -> Self {
        Self {
            query_id: Uuid::new_v4(),
            processed_at: Utc::now(),
            response_time_ms,
            model_used: model_used.into(),
        }
    }
}
