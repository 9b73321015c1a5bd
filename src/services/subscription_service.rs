use crate::entities::{credit_log_entity as credit_logs, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActionKind, CreditLogResponse, DeductResponse, FundingSource, NotificationType,
    PaginatedResponse, PaginationParams, PlanType, Role, SIGNUP_CREDITS, SubscriptionResponse,
    TokenKind,
};
use crate::realtime::{EventHub, RealtimeEvent};
use crate::services::notification_service::insert_notification;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
    hub: EventHub,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection, hub: EventHub) -> Self {
        Self { pool, hub }
    }

    /// Fetch the caller's subscription state, creating the account row with
    /// signup defaults if it does not exist yet. The lazy create mirrors the
    /// first-login provisioning path, so a valid token never observes a
    /// missing account.
    pub async fn get_subscription(&self, user_id: i64, email: &str) -> AppResult<SubscriptionResponse> {
        let user = self.ensure_account(user_id, email).await?;
        Ok(user.into())
    }

    /// Spend credits (or a dedicated token) for one billable action.
    ///
    /// Funding priority:
    /// 1. The action's token bucket, when positive - decremented by exactly
    ///    1 whatever the nominal cost, logged as a zero-amount ledger entry.
    /// 2. Generic credits - decremented by the full cost.
    ///
    /// Both decrements are conditional updates (`WHERE bucket > 0`,
    /// `WHERE credits >= cost`), so the check and the write are a single
    /// statement and concurrent spends can never drive a balance negative.
    pub async fn deduct_for_action(
        &self,
        user_id: i64,
        email: &str,
        action: ActionKind,
        reason: &str,
    ) -> AppResult<DeductResponse> {
        let cost = action.cost();
        let txn = self.pool.begin().await?;

        let user = self.ensure_account_tx(&txn, user_id, email).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        // Token bucket first
        if let Some(bucket) = action.token_bucket() {
            let (column, label) = match bucket {
                TokenKind::Image => (users::Column::ImageTokens, "Image"),
                TokenKind::Code => (users::Column::CodeTokens, "Code"),
            };

            let result = users::Entity::update_many()
                .col_expr(column, Expr::col(column).sub(1))
                .filter(users::Column::Id.eq(user_id))
                .filter(column.gt(0))
                .exec(&txn)
                .await?;

            if result.rows_affected == 1 {
                credit_logs::ActiveModel {
                    user_id: Set(user_id),
                    amount: Set(0),
                    reason: Set(format!("Used {label} Token: {reason}")),
                    action_type: Set("token".to_string()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                let fresh = self.fetch_account_tx(&txn, user_id).await?;
                txn.commit().await?;

                return Ok(DeductResponse {
                    funded_by: match bucket {
                        TokenKind::Image => FundingSource::ImageToken,
                        TokenKind::Code => FundingSource::CodeToken,
                    },
                    cost,
                    credits: fresh.credits,
                    image_tokens: fresh.image_tokens,
                    code_tokens: fresh.code_tokens,
                });
            }
            // Bucket empty - fall through to credits
        }

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Credits,
                Expr::col(users::Column::Credits).sub(cost),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Credits.gte(cost))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ValidationError("Insufficient credits".to_string()));
        }

        credit_logs::ActiveModel {
            user_id: Set(user_id),
            amount: Set(-cost),
            reason: Set(reason.to_string()),
            action_type: Set("usage".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let fresh = self.fetch_account_tx(&txn, user_id).await?;
        txn.commit().await?;

        self.hub.publish(RealtimeEvent::CreditBalance {
            user_id,
            credits: fresh.credits,
            delta: -cost,
            reason: reason.to_string(),
        });

        Ok(DeductResponse {
            funded_by: FundingSource::Credits,
            cost,
            credits: fresh.credits,
            image_tokens: fresh.image_tokens,
            code_tokens: fresh.code_tokens,
        })
    }

    /// Add credits, write the ledger entry, notify the user. Used by admin
    /// top-ups; reward engines and payment approval carry their own grants
    /// inside their own transactions.
    pub async fn grant_credits(
        &self,
        user_id: i64,
        amount: i64,
        reason: &str,
        actor_id: Option<i64>,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::ValidationError("Amount must be positive".to_string()));
        }

        let txn = self.pool.begin().await?;

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Credits,
                Expr::col(users::Column::Credits).add(amount),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        credit_logs::ActiveModel {
            user_id: Set(user_id),
            amount: Set(amount),
            reason: Set(reason.to_string()),
            actor_id: Set(actor_id),
            action_type: Set("manual".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_notification(
            &txn,
            user_id,
            "Credits added".to_string(),
            format!("{amount} credits were added to your account. {reason}"),
            NotificationType::CreditAddition,
        )
        .await?;

        let fresh = self.fetch_account_tx(&txn, user_id).await?;
        txn.commit().await?;

        self.hub.publish(RealtimeEvent::CreditBalance {
            user_id,
            credits: fresh.credits,
            delta: amount,
            reason: reason.to_string(),
        });
        self.hub.publish(RealtimeEvent::NotificationsChanged { user_id });

        Ok(fresh.credits)
    }

    /// Remove credits, clamping the balance at zero the way the back office
    /// always has. The ledger records the requested amount; the balance stays
    /// authoritative.
    pub async fn revoke_credits(
        &self,
        user_id: i64,
        amount: i64,
        reason: &str,
        actor_id: Option<i64>,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::ValidationError("Amount must be positive".to_string()));
        }

        let txn = self.pool.begin().await?;

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Credits,
                Expr::cust_with_values("GREATEST(credits - ?, 0)", [amount]),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        credit_logs::ActiveModel {
            user_id: Set(user_id),
            amount: Set(-amount),
            reason: Set(reason.to_string()),
            actor_id: Set(actor_id),
            action_type: Set("deduction".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_notification(
            &txn,
            user_id,
            "Credits deducted".to_string(),
            format!("{amount} credits were deducted. Reason: {reason}"),
            NotificationType::CreditDeduction,
        )
        .await?;

        let fresh = self.fetch_account_tx(&txn, user_id).await?;
        txn.commit().await?;

        self.hub.publish(RealtimeEvent::CreditBalance {
            user_id,
            credits: fresh.credits,
            delta: -amount,
            reason: reason.to_string(),
        });
        self.hub.publish(RealtimeEvent::NotificationsChanged { user_id });

        Ok(fresh.credits)
    }

    /// The user's slice of the ledger, newest first.
    pub async fn get_credit_logs(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<CreditLogResponse>> {
        let base_query = credit_logs::Entity::find().filter(credit_logs::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by(credit_logs::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(CreditLogResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// Measure drift between the running balances and the replayed ledger.
    /// Signup credits are granted without a ledger entry, so the expected
    /// balance is `SIGNUP_CREDITS + sum(ledger)`. Advisory only - the
    /// reconciliation task logs what it finds and changes nothing.
    pub async fn ledger_drift(&self) -> AppResult<Vec<(i64, i64, i64)>> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct LedgerSumRow {
            user_id: i64,
            total: i64,
        }

        let sums: Vec<LedgerSumRow> = credit_logs::Entity::find()
            .select_only()
            .column(credit_logs::Column::UserId)
            .column_as(Expr::cust("COALESCE(SUM(amount), 0)::BIGINT"), "total")
            .group_by(credit_logs::Column::UserId)
            .into_model::<LedgerSumRow>()
            .all(&self.pool)
            .await?;

        let mut drifted = Vec::new();
        for row in sums {
            if let Some(user) = users::Entity::find_by_id(row.user_id).one(&self.pool).await? {
                let expected = SIGNUP_CREDITS + row.total;
                if user.credits != expected {
                    drifted.push((row.user_id, user.credits, expected));
                }
            }
        }
        Ok(drifted)
    }

    // -----------------------------
    // Internal helpers
    // -----------------------------

    async fn ensure_account(&self, user_id: i64, email: &str) -> AppResult<users::Model> {
        if let Some(user) = users::Entity::find_by_id(user_id).one(&self.pool).await? {
            return Ok(user);
        }
        self.insert_default_account(&self.pool, user_id, email).await
    }

    async fn ensure_account_tx(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
        email: &str,
    ) -> AppResult<users::Model> {
        if let Some(user) = users::Entity::find_by_id(user_id).one(txn).await? {
            return Ok(user);
        }
        self.insert_default_account(txn, user_id, email).await
    }

    async fn fetch_account_tx(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
    ) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Provision an account with signup defaults. The empty password hash
    /// never verifies, so a row created here cannot be logged into until a
    /// real registration overwrites it.
    async fn insert_default_account<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        email: &str,
    ) -> AppResult<users::Model> {
        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set(email.to_string()),
            password_hash: Set(String::new()),
            role: Set(Role::User),
            credits: Set(SIGNUP_CREDITS),
            plan_type: Set(PlanType::Free),
            last_login: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(user)
    }
}
