use crate::entities::activity_log_entity as activity_logs;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

/// Append a row to the activity audit trail. Works inside or outside a
/// transaction; failures are the caller's to propagate since a lost audit
/// row should abort the surrounding write.
pub async fn record_activity<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    action_type: &str,
    details: serde_json::Value,
    credits_used: i64,
) -> Result<(), DbErr> {
    activity_logs::ActiveModel {
        user_id: Set(user_id),
        action_type: Set(action_type.to_string()),
        details: Set(details),
        credits_used: Set(credits_used),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}
