use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Single-use discount coupon. Redemption flips `is_used` through a
/// conditional update (`WHERE is_used = false AND expires_at > now`), so a
/// code can be consumed at most once even under concurrent redemption.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub user_id: i64,
    pub discount_percent: i32,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
