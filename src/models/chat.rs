use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveChatRequest {
    /// Transcript entries as produced by the session view; stored verbatim.
    pub messages: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub id: i64,
    pub user_id: i64,
    pub messages: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::chat_history_entity::Model> for ChatHistoryResponse {
    fn from(h: crate::entities::chat_history_entity::Model) -> Self {
        Self {
            id: h.id,
            user_id: h.user_id,
            messages: h.messages,
            created_at: h.created_at.unwrap_or_else(Utc::now),
        }
    }
}
