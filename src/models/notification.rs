use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum NotificationType {
    #[sea_orm(string_value = "success")]
    #[serde(rename = "success")]
    Success,
    #[sea_orm(string_value = "error")]
    #[serde(rename = "error")]
    Error,
    #[sea_orm(string_value = "warning")]
    #[serde(rename = "warning")]
    Warning,
    #[sea_orm(string_value = "info")]
    #[serde(rename = "info")]
    Info,
    #[sea_orm(string_value = "credit_addition")]
    #[serde(rename = "credit_addition")]
    CreditAddition,
    #[sea_orm(string_value = "credit_deduction")]
    #[serde(rename = "credit_deduction")]
    CreditDeduction,
    #[sea_orm(string_value = "reward")]
    #[serde(rename = "reward")]
    Reward,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::notification_entity::Model> for NotificationResponse {
    fn from(n: crate::entities::notification_entity::Model) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            is_read: n.is_read,
            created_at: n.created_at.unwrap_or_else(Utc::now),
        }
    }
}
