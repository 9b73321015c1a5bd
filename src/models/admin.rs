use crate::models::{NotificationType, PlanType, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full account view for the back office. Includes fields the user-facing
/// responses deliberately omit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserResponse {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub credits: i64,
    pub plan_type: PlanType,
    pub image_tokens: i64,
    pub code_tokens: i64,
    pub is_blocked: bool,
    pub reward_streak: i64,
    pub total_rewards_claimed: i64,
    pub login_count: i64,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetBlockedRequest {
    pub is_blocked: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdjustCreditsRequest {
    /// Credits to add or remove. Must be positive; the endpoint decides
    /// the direction.
    pub amount: i64,
    #[schema(example = "Goodwill for outage on 2026-01-14")]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BroadcastRequest {
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    /// `None` broadcasts to every account.
    pub target_user_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BroadcastResponse {
    pub recipients: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    pub total_revenue: i64,
    pub monthly_revenue: i64,
    pub daily_revenue: i64,
    pub total_transactions: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub currency: String,
    pub plan_type: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityLogResponse {
    pub id: i64,
    pub user_id: i64,
    pub action_type: String,
    pub details: serde_json::Value,
    pub credits_used: i64,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::user_entity::Model> for AdminUserResponse {
    fn from(user: crate::entities::user_entity::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            credits: user.credits,
            plan_type: user.plan_type,
            image_tokens: user.image_tokens,
            code_tokens: user.code_tokens,
            is_blocked: user.is_blocked,
            reward_streak: user.reward_streak,
            total_rewards_claimed: user.total_rewards_claimed,
            login_count: user.login_count,
            last_login: user.last_login,
            created_at: user.created_at.unwrap_or_else(Utc::now),
        }
    }
}

impl From<crate::entities::transaction_entity::Model> for TransactionResponse {
    fn from(t: crate::entities::transaction_entity::Model) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            amount: t.amount,
            currency: t.currency,
            plan_type: t.plan_type,
            status: t.status,
            payment_method: t.payment_method,
            reference: t.reference,
            created_at: t.created_at.unwrap_or_else(Utc::now),
        }
    }
}

impl From<crate::entities::activity_log_entity::Model> for ActivityLogResponse {
    fn from(log: crate::entities::activity_log_entity::Model) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            action_type: log.action_type,
            details: log.details,
            credits_used: log.credits_used,
            created_at: log.created_at.unwrap_or_else(Utc::now),
        }
    }
}
