use crate::entities::chat_history_entity as chat_histories;
use crate::error::{AppError, AppResult};
use crate::models::ChatHistoryResponse;
use crate::services::audit::record_activity;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;

#[derive(Clone)]
pub struct ChatService {
    pool: DatabaseConnection,
}

impl ChatService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Persist one conversation transcript. Empty transcripts are dropped
    /// silently - the session view flushes on every disconnect, including
    /// ones where nothing was said.
    pub async fn save(&self, user_id: i64, messages: serde_json::Value) -> AppResult<Option<ChatHistoryResponse>> {
        let is_empty = messages.as_array().map(|a| a.is_empty()).unwrap_or(true);
        if is_empty {
            return Ok(None);
        }

        let model = chat_histories::ActiveModel {
            user_id: Set(user_id),
            messages: Set(messages),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(Some(model.into()))
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<ChatHistoryResponse>> {
        let items = chat_histories::Entity::find()
            .filter(chat_histories::Column::UserId.eq(user_id))
            .order_by_desc(chat_histories::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Delete one conversation. Scoped to the owner; admins pass the target
    /// user's id plus their own as actor.
    pub async fn delete(
        &self,
        user_id: i64,
        history_id: i64,
        actor_id: Option<i64>,
    ) -> AppResult<()> {
        let result = chat_histories::Entity::delete_many()
            .filter(chat_histories::Column::Id.eq(history_id))
            .filter(chat_histories::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Conversation not found".to_string()));
        }

        let action = if actor_id.is_some() { "admin_history_delete" } else { "history_delete" };
        record_activity(
            &self.pool,
            user_id,
            action,
            json!({ "history_id": history_id, "admin_id": actor_id }),
            0,
        )
        .await?;

        Ok(())
    }

    /// Delete every conversation for an account.
    pub async fn delete_all(&self, user_id: i64, actor_id: Option<i64>) -> AppResult<u64> {
        let result = chat_histories::Entity::delete_many()
            .filter(chat_histories::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;

        let action = if actor_id.is_some() { "admin_history_delete_all" } else { "history_delete_all" };
        record_activity(
            &self.pool,
            user_id,
            action,
            json!({ "deleted": result.rows_affected, "admin_id": actor_id }),
            0,
        )
        .await?;

        Ok(result.rows_affected)
    }
}
