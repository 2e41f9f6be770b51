use serde::{Deserialize, Serialize};

/// A free-text health question as received from the transport layer.
///
/// Request-scoped: nothing here outlives the single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalQuery {
    pub text: String,
    pub user_id: String,
    /// Caller-supplied context from the current conversation, if any.
    pub context: Option<QueryContext>,
}

impl MedicalQuery {
    pub fn new(text: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: QueryContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Free-form context the caller attaches to a query. The pipeline keeps no
/// dialogue memory of its own; this is all it ever sees of prior turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub severity: Option<String>,
    #[serde(default)]
    pub previous_conditions: Vec<String>,
}
