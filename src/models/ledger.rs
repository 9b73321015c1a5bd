use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreditLogResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub reason: String,
    pub actor_id: Option<i64>,
    pub action_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreditLogQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<crate::entities::credit_log_entity::Model> for CreditLogResponse {
    fn from(log: crate::entities::credit_log_entity::Model) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            amount: log.amount,
            reason: log.reason,
            actor_id: log.actor_id,
            action_type: log.action_type,
            created_at: log.created_at.unwrap_or_else(Utc::now),
        }
    }
}
