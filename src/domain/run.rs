use serde::{Deserialize, Serialize};

/// A recorded execution attempt by an agent on behalf of a user.
///
/// Timestamps are kept as text. Values written through the API are
/// normalized to RFC 3339; bulk-imported values are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgentRun {
    pub id: i64,
    pub agent_id: i64,
    pub user_id: i64,
    pub input_data: String,
    pub output_data: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub feedback: Option<i64>,
}

/// Creation payload: every [`AgentRun`] field except the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgentRun {
    pub agent_id: i64,
    pub user_id: i64,
    pub input_data: String,
    pub output_data: String,
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// Omitted feedback is neutral (`0`); an explicit `null` stays absent.
    #[serde(default = "default_feedback")]
    pub feedback: Option<i64>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_feedback() -> Option<i64> {
    Some(0)
}

impl NewAgentRun {
    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: i64) -> AgentRun {
        AgentRun {
            id,
            agent_id: self.agent_id,
            user_id: self.user_id,
            input_data: self.input_data,
            output_data: self.output_data,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            feedback: self.feedback,
        }
    }
}

/// Optional equality filters for listing runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    pub agent_id: Option<i64>,
    pub status: Option<String>,
    pub feedback: Option<i64>,
}

impl RunFilter {
    pub fn agent(agent_id: i64) -> Self {
        Self {
            agent_id: Some(agent_id),
            ..Self::default()
        }
    }
}
