use crate::entities::notification_entity as notifications;
use crate::error::{AppError, AppResult};
use crate::models::{NotificationResponse, NotificationType};
use crate::realtime::{EventHub, RealtimeEvent};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Insert a notification row. Free function so other services can create
/// notifications inside their own transactions.
pub async fn insert_notification<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    title: String,
    message: String,
    notification_type: NotificationType,
) -> Result<notifications::Model, DbErr> {
    notifications::ActiveModel {
        user_id: Set(user_id),
        title: Set(title),
        message: Set(message),
        notification_type: Set(notification_type),
        is_read: Set(false),
        ..Default::default()
    }
    .insert(conn)
    .await
}

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
    hub: EventHub,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection, hub: EventHub) -> Self {
        Self { pool, hub }
    }

    pub async fn create(
        &self,
        user_id: i64,
        title: String,
        message: String,
        notification_type: NotificationType,
    ) -> AppResult<NotificationResponse> {
        let model =
            insert_notification(&self.pool, user_id, title, message, notification_type).await?;
        self.hub.publish(RealtimeEvent::NotificationsChanged { user_id });
        Ok(model.into())
    }

    /// Latest notifications for the inbox drawer.
    pub async fn list(&self, user_id: i64) -> AppResult<Vec<NotificationResponse>> {
        let items = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(20)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn list_unread(&self, user_id: i64) -> AppResult<Vec<NotificationResponse>> {
        let items = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Flip the read flag. Scoped to the owner so one user cannot mark
    /// another user's inbox.
    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(notification_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: i64) -> AppResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, user_id: i64, notification_id: i64) -> AppResult<()> {
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::Id.eq(notification_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }
}
