use crate::models::{PlanType, Role};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Account row. Credits and token buckets are only ever changed through
/// conditional updates (`WHERE credits >= n`, `WHERE bucket > 0`) so the
/// balance can never be driven negative by concurrent spends.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub credits: i64,
    pub plan_type: PlanType,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub image_tokens: i64,
    pub code_tokens: i64,
    pub is_blocked: bool,
    pub reward_streak: i64,
    pub total_rewards_claimed: i64,
    pub last_reward_claim: Option<DateTime<Utc>>,
    pub last_spin_time: Option<DateTime<Utc>>,
    pub last_dice_roll: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub login_count: i64,
    pub snowflakes: i64,
    pub ice_coins: i64,
    pub winter_tokens: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
