use crate::entities::{
    credit_log_entity as credit_logs, payment_request_entity as payment_requests,
    transaction_entity as transactions, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::external::MailerService;
use crate::external::mailer::DecisionEmailKind;
use crate::models::{
    CreatePaymentRequest, NotificationType, PaginatedResponse, PaginationParams, PaymentRequestResponse,
    PaymentStatus,
};
use crate::realtime::{EventHub, RealtimeEvent};
use crate::services::audit::record_activity;
use crate::services::notification_service::insert_notification;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    hub: EventHub,
    mailer: MailerService,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, hub: EventHub, mailer: MailerService) -> Self {
        Self { pool, hub, mailer }
    }

    /// Submit a top-up or upgrade request for manual review.
    pub async fn create_request(
        &self,
        user_id: i64,
        user_email: &str,
        request: CreatePaymentRequest,
    ) -> AppResult<PaymentRequestResponse> {
        if request.amount <= 0 {
            return Err(AppError::ValidationError("Amount must be positive".to_string()));
        }

        let model = payment_requests::ActiveModel {
            user_id: Set(user_id),
            user_email: Set(user_email.to_string()),
            amount: Set(request.amount),
            plan_type: Set(request.plan_type),
            status: Set(PaymentStatus::Pending),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        record_activity(
            &self.pool,
            user_id,
            "payment_request",
            json!({ "amount": request.amount, "plan_type": request.plan_type }),
            0,
        )
        .await?;

        log::info!("Payment request {} created by user {user_id}", model.id);
        Ok(model.into())
    }

    pub async fn my_requests(&self, user_id: i64) -> AppResult<Vec<PaymentRequestResponse>> {
        let items = payment_requests::Entity::find()
            .filter(payment_requests::Column::UserId.eq(user_id))
            .order_by_desc(payment_requests::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn pending_requests(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PaymentRequestResponse>> {
        let base_query = payment_requests::Entity::find()
            .filter(payment_requests::Column::Status.eq(PaymentStatus::Pending));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by(payment_requests::Column::CreatedAt, Order::Desc)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(PaymentRequestResponse::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_page_size(),
            total,
        ))
    }

    /// Approve a pending request.
    ///
    /// The `pending -> approved` transition is a conditional update and runs
    /// FIRST: zero affected rows means the request was already decided and
    /// the call returns `Conflict` without touching the account, so a
    /// double-click or a racing second admin can never double-grant. Grant,
    /// plan change, ledger entry and revenue record commit atomically with
    /// the transition; the email goes out after the commit, fire-and-forget.
    pub async fn approve(&self, admin_id: i64, request_id: i64) -> AppResult<PaymentRequestResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let request = payment_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment request not found".to_string()))?;

        let result = payment_requests::Entity::update_many()
            .col_expr(payment_requests::Column::Status, Expr::value(PaymentStatus::Approved))
            .col_expr(payment_requests::Column::DecidedBy, Expr::value(admin_id))
            .col_expr(payment_requests::Column::DecidedAt, Expr::value(now))
            .col_expr(payment_requests::Column::UpdatedAt, Expr::value(now))
            .filter(payment_requests::Column::Id.eq(request_id))
            .filter(payment_requests::Column::Status.eq(PaymentStatus::Pending))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(
                "Payment request already decided".to_string(),
            ));
        }

        // Credit grant, plus the plan switch when one was requested
        let mut update = users::Entity::update_many()
            .col_expr(
                users::Column::Credits,
                Expr::col(users::Column::Credits).add(request.amount),
            )
            .filter(users::Column::Id.eq(request.user_id));
        if let Some(plan) = request.plan_type {
            update = update
                .col_expr(users::Column::PlanType, Expr::value(plan))
                .col_expr(
                    users::Column::SubscriptionEndDate,
                    Expr::value(now + chrono::Duration::days(30)),
                );
        }
        let granted = update.exec(&txn).await?;
        if granted.rows_affected == 0 {
            return Err(AppError::NotFound("Requesting user no longer exists".to_string()));
        }

        let reason = match request.plan_type {
            Some(plan) => format!("Payment Approved: {plan}"),
            None => "Payment Approved: Credits Top-up".to_string(),
        };

        credit_logs::ActiveModel {
            user_id: Set(request.user_id),
            amount: Set(request.amount),
            reason: Set(reason),
            actor_id: Set(Some(admin_id)),
            action_type: Set("manual".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // Revenue record for the analytics page. Top-ups are priced at half
        // a rupee per credit, plans at their list price.
        let revenue = match request.plan_type {
            Some(plan) => plan.details().price,
            None => request.amount / 2,
        };
        transactions::ActiveModel {
            user_id: Set(request.user_id),
            amount: Set(revenue),
            currency: Set("INR".to_string()),
            plan_type: Set(request
                .plan_type
                .map(|p| p.to_string())
                .unwrap_or_else(|| "credit_pack".to_string())),
            status: Set("completed".to_string()),
            payment_method: Set(Some("manual_approval".to_string())),
            reference: Set(Some(request.id.to_string())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let plan_suffix = request
            .plan_type
            .map(|p| format!(" ({} plan)", p.details().name))
            .unwrap_or_default();
        insert_notification(
            &txn,
            request.user_id,
            "Payment approved".to_string(),
            format!(
                "Your payment request for {} credits{plan_suffix} has been approved. Credits have been added to your account.",
                request.amount
            ),
            NotificationType::Success,
        )
        .await?;

        record_activity(
            &txn,
            request.user_id,
            "payment_approved",
            json!({ "request_id": request.id, "amount": request.amount, "admin_id": admin_id }),
            0,
        )
        .await?;

        let fresh_balance = users::Entity::find_by_id(request.user_id)
            .one(&txn)
            .await?
            .map(|u| u.credits)
            .unwrap_or(0);

        txn.commit().await?;

        self.hub.publish(RealtimeEvent::CreditBalance {
            user_id: request.user_id,
            credits: fresh_balance,
            delta: request.amount,
            reason: "Payment approved".to_string(),
        });
        self.hub.publish(RealtimeEvent::NotificationsChanged {
            user_id: request.user_id,
        });

        self.send_approval_email(&request, now);

        let decided = payment_requests::Entity::find_by_id(request_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment request not found".to_string()))?;
        Ok(decided.into())
    }

    /// Reject a pending request. Same single-transition guard as approval;
    /// rejection never touches the account balance.
    pub async fn reject(&self, admin_id: i64, request_id: i64) -> AppResult<PaymentRequestResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let request = payment_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment request not found".to_string()))?;

        let result = payment_requests::Entity::update_many()
            .col_expr(payment_requests::Column::Status, Expr::value(PaymentStatus::Rejected))
            .col_expr(payment_requests::Column::DecidedBy, Expr::value(admin_id))
            .col_expr(payment_requests::Column::DecidedAt, Expr::value(now))
            .col_expr(payment_requests::Column::UpdatedAt, Expr::value(now))
            .filter(payment_requests::Column::Id.eq(request_id))
            .filter(payment_requests::Column::Status.eq(PaymentStatus::Pending))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(
                "Payment request already decided".to_string(),
            ));
        }

        let plan_suffix = request
            .plan_type
            .map(|p| format!(" ({} plan)", p.details().name))
            .unwrap_or_default();
        insert_notification(
            &txn,
            request.user_id,
            "Payment rejected".to_string(),
            format!(
                "Your payment request for {} credits{plan_suffix} has been rejected. Please contact support for more information.",
                request.amount
            ),
            NotificationType::Error,
        )
        .await?;

        record_activity(
            &txn,
            request.user_id,
            "payment_rejected",
            json!({ "request_id": request.id, "admin_id": admin_id }),
            0,
        )
        .await?;

        txn.commit().await?;

        self.hub.publish(RealtimeEvent::NotificationsChanged {
            user_id: request.user_id,
        });

        self.mailer.send_decision_email(
            DecisionEmailKind::Rejection,
            &request.user_email,
            json!({
                "customerName": customer_name(&request.user_email),
                "amount": request.plan_type.map(|p| p.details().price).unwrap_or(request.amount / 2),
                "reason": "Please contact support for details.",
            }),
        );

        let decided = payment_requests::Entity::find_by_id(request_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment request not found".to_string()))?;
        Ok(decided.into())
    }

    // -----------------------------
    // Internal helpers
    // -----------------------------

    fn send_approval_email(&self, request: &payment_requests::Model, now: chrono::DateTime<Utc>) {
        let plan = request.plan_type.map(|p| p.details());
        let base_amount = plan
            .as_ref()
            .map(|p| p.price)
            .unwrap_or(request.amount / 2);
        let tax = (base_amount as f64 * 0.18).round() as i64; // 18% GST
        let invoice = json!({
            "invoiceNumber": format!("INV-{}", Uuid::new_v4().simple()),
            "date": now.format("%d/%m/%Y").to_string(),
            "customerName": customer_name(&request.user_email),
            "customerEmail": request.user_email,
            "planName": plan.as_ref().map(|p| p.name).unwrap_or("Credit Top-up"),
            "credits": request.amount,
            "amount": base_amount,
            "discount": 0,
            "tax": tax,
            "total": base_amount + tax,
        });

        self.mailer
            .send_decision_email(DecisionEmailKind::Approval, &request.user_email, invoice);
    }
}

fn customer_name(email: &str) -> String {
    email.split('@').next().unwrap_or("Customer").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_name_from_email() {
        assert_eq!(customer_name("priya@example.com"), "priya");
        assert_eq!(customer_name("no-at-sign"), "no-at-sign");
    }
}
