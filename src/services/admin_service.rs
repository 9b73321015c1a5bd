use crate::entities::{
    activity_log_entity as activity_logs, notification_entity as notifications,
    session_revocation_entity as session_revocations, transaction_entity as transactions,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityLogResponse, AdminUserResponse, AnalyticsSummary, BroadcastRequest, NotificationType,
    PaginatedResponse, PaginationParams, TransactionResponse,
};
use crate::realtime::{EventHub, RealtimeEvent};
use crate::services::audit::record_activity;
use chrono::{Datelike, TimeZone, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
    hub: EventHub,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection, hub: EventHub) -> Self {
        Self { pool, hub }
    }

    /// Accounts ordered by most recent sign-in, the way the back office
    /// lists them.
    pub async fn list_users(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<AdminUserResponse>> {
        let total = users::Entity::find().count(&self.pool).await? as i64;

        let items = users::Entity::find()
            .order_by(users::Column::LastLogin, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(AdminUserResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<AdminUserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn set_blocked(
        &self,
        admin_id: i64,
        user_id: i64,
        is_blocked: bool,
    ) -> AppResult<AdminUserResponse> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsBlocked, Expr::value(is_blocked))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        record_activity(
            &self.pool,
            user_id,
            if is_blocked { "blocked" } else { "unblocked" },
            json!({ "admin_id": admin_id }),
            0,
        )
        .await?;

        self.hub.publish(RealtimeEvent::AccountFlag { user_id, is_blocked });

        log::info!(
            "Admin {admin_id} {} user {user_id}",
            if is_blocked { "blocked" } else { "unblocked" }
        );

        self.get_user(user_id).await
    }

    /// Insert a force-logout sentinel and push the signal. Tokens issued
    /// before the sentinel fail refresh and the session-status poll; already
    /// issued access tokens ride out their (short) lifetime.
    pub async fn force_logout(&self, admin_id: i64, user_id: i64) -> AppResult<()> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        session_revocations::ActiveModel {
            user_id: Set(user_id),
            revoked_by: Set(admin_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        record_activity(
            &self.pool,
            user_id,
            "force_logout",
            json!({ "admin_id": admin_id }),
            0,
        )
        .await?;

        self.hub.publish(RealtimeEvent::ForceLogout { user_id });

        log::info!("Admin {admin_id} force-logged-out user {user_id}");
        Ok(())
    }

    /// Send an announcement to one account or to everyone. Notification rows
    /// make it durable; the realtime event makes it immediate.
    pub async fn broadcast(&self, admin_id: i64, request: BroadcastRequest) -> AppResult<u64> {
        let recipients: Vec<i64> = match request.target_user_id {
            Some(user_id) => {
                users::Entity::find_by_id(user_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
                vec![user_id]
            }
            None => users::Entity::find()
                .select_only()
                .column(users::Column::Id)
                .into_tuple()
                .all(&self.pool)
                .await?,
        };

        for user_id in &recipients {
            notifications::ActiveModel {
                user_id: Set(*user_id),
                title: Set(request.title.clone()),
                message: Set(request.message.clone()),
                notification_type: Set(request.notification_type),
                is_read: Set(false),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;
        }

        self.hub.publish(RealtimeEvent::Broadcast {
            user_id: request.target_user_id,
            title: request.title.clone(),
            message: request.message.clone(),
            notification_type: request.notification_type,
        });

        log::info!(
            "Admin {admin_id} broadcast \"{}\" to {} recipient(s)",
            request.title,
            recipients.len()
        );
        Ok(recipients.len() as u64)
    }

    /// Per-account activity trail for the back office drill-down.
    pub async fn user_activity(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ActivityLogResponse>> {
        let base_query =
            activity_logs::Entity::find().filter(activity_logs::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by(activity_logs::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(ActivityLogResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// Revenue rollup: lifetime, current month, current day.
    pub async fn analytics_summary(&self) -> AppResult<AnalyticsSummary> {
        let completed = transactions::Entity::find()
            .filter(transactions::Column::Status.eq("completed"))
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let month_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        let day_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now);

        let mut summary = AnalyticsSummary {
            total_revenue: 0,
            monthly_revenue: 0,
            daily_revenue: 0,
            total_transactions: completed.len() as i64,
        };

        for t in &completed {
            summary.total_revenue += t.amount;
            let created = t.created_at.unwrap_or(now);
            if created >= month_start {
                summary.monthly_revenue += t.amount;
            }
            if created >= day_start {
                summary.daily_revenue += t.amount;
            }
        }

        Ok(summary)
    }

    pub async fn recent_transactions(&self, limit: u64) -> AppResult<Vec<TransactionResponse>> {
        let items = transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}
