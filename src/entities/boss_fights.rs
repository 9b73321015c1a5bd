use crate::models::BossStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A community boss. HP is clamped at zero by a conditional update and the
/// `active -> defeated` transition happens exactly once.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "boss_fights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub max_hp: i64,
    pub current_hp: i64,
    pub status: BossStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
