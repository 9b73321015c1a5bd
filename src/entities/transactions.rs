use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Revenue record behind the admin analytics page. Written on payment
/// approval and manual admin top-ups.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub currency: String,
    pub plan_type: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
