use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum RewardType {
    #[sea_orm(string_value = "credits")]
    #[serde(rename = "credits")]
    Credits,
    #[sea_orm(string_value = "coupon")]
    #[serde(rename = "coupon")]
    Coupon,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyRewardResponse {
    pub id: i64,
    pub user_id: i64,
    pub reward_type: RewardType,
    pub reward_value: i64,
    pub coupon_code: Option<String>,
    pub streak_day: i64,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RewardStatusResponse {
    pub can_claim: bool,
    pub next_claim_time: Option<DateTime<Utc>>,
    pub reward_streak: i64,
    pub total_rewards_claimed: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponResponse {
    pub id: i64,
    pub code: String,
    pub discount_percent: i32,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemCouponRequest {
    #[schema(example = "VYAAS-7Q2K")]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemCouponResponse {
    pub valid: bool,
    pub discount_percent: i32,
    pub message: String,
}

impl From<crate::entities::daily_reward_entity::Model> for DailyRewardResponse {
    fn from(r: crate::entities::daily_reward_entity::Model) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            reward_type: r.reward_type,
            reward_value: r.reward_value,
            coupon_code: r.coupon_code,
            streak_day: r.streak_day,
            claimed_at: r.claimed_at.unwrap_or_else(Utc::now),
        }
    }
}

impl From<crate::entities::coupon_entity::Model> for CouponResponse {
    fn from(c: crate::entities::coupon_entity::Model) -> Self {
        Self {
            id: c.id,
            code: c.code,
            discount_percent: c.discount_percent,
            is_used: c.is_used,
            expires_at: c.expires_at,
            created_at: c.created_at.unwrap_or_else(Utc::now),
        }
    }
}
