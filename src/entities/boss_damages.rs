use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Per-user damage tally for one boss, unique on (boss_id, user_id) and
/// incremented atomically on every attack.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "boss_damages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub boss_id: i64,
    pub user_id: i64,
    pub total_damage: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
