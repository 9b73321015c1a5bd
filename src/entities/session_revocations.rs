use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Force-logout sentinel. A token whose `iat` predates the newest sentinel
/// for its user is rejected wherever the token is re-examined (refresh and
/// the session-status endpoint).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "session_revocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub revoked_by: i64,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
