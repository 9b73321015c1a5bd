use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Append-only credit ledger. Rows are never updated or deleted; the account
/// balance stays authoritative and a background audit measures drift.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "credit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub reason: String,
    pub actor_id: Option<i64>,
    pub action_type: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
