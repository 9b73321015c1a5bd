use crate::models::PlanType;
use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    #[serde(rename = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    #[serde(rename = "rejected")]
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Credits requested. For a plan upgrade this is the plan's credit grant.
    pub amount: i64,
    /// Requested plan; `None` for a plain credit top-up.
    pub plan_type: Option<PlanType>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequestResponse {
    pub id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub amount: i64,
    pub plan_type: Option<PlanType>,
    pub status: PaymentStatus,
    pub decided_by: Option<i64>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entities::payment_request_entity::Model> for PaymentRequestResponse {
    fn from(req: crate::entities::payment_request_entity::Model) -> Self {
        Self {
            id: req.id,
            user_id: req.user_id,
            user_email: req.user_email,
            amount: req.amount,
            plan_type: req.plan_type,
            status: req.status,
            decided_by: req.decided_by,
            decided_at: req.decided_at,
            created_at: req.created_at.unwrap_or_else(Utc::now),
        }
    }
}
