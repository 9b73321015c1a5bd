use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::{AdminService, ChatService, PaymentService, SubscriptionService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[derive(Debug, serde::Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts by most recent sign-in"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn list_users(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    let params = PaginationParams::new(query.page, query.per_page);

    match admin_service.list_users(&params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account detail", body = AdminUserResponse),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_user(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.get_user(path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "user": user }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}/blocked",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    request_body = SetBlockedRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Block flag updated", body = AdminUserResponse),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn set_blocked(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SetBlockedRequest>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match admin_service
        .set_blocked(ctx.user_id, path.into_inner(), request.is_blocked)
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "user": user }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/force-logout",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sessions invalidated"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn force_logout(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match admin_service.force_logout(ctx.user_id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/credits/add",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    request_body = AdjustCreditsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Credits granted"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn add_credits(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AdjustCreditsRequest>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match subscription_service
        .grant_credits(path.into_inner(), request.amount, &request.reason, Some(ctx.user_id))
        .await
    {
        Ok(credits) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "credits": credits }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/credits/remove",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    request_body = AdjustCreditsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Credits revoked (balance clamps at zero)"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn remove_credits(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AdjustCreditsRequest>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match subscription_service
        .revoke_credits(path.into_inner(), request.amount, &request.reason, Some(ctx.user_id))
        .await
    {
        Ok(credits) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "credits": credits }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/payment-requests",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending payment requests"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn pending_payment_requests(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    let params = PaginationParams::new(query.page, query.per_page);

    match payment_service.pending_requests(&params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payment-requests/{id}/approve",
    tag = "admin",
    params(("id" = i64, Path, description = "Payment request id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request approved, credits granted", body = PaymentRequestResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn approve_payment_request(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match payment_service.approve(ctx.user_id, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/payment-requests/{id}/reject",
    tag = "admin",
    params(("id" = i64, Path, description = "Payment request id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request rejected", body = PaymentRequestResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn reject_payment_request(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match payment_service.reject(ctx.user_id, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/broadcast",
    tag = "admin",
    request_body = BroadcastRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement delivered", body = BroadcastResponse),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn broadcast(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    request: web::Json<BroadcastRequest>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match admin_service.broadcast(ctx.user_id, request.into_inner()).await {
        Ok(recipients) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": BroadcastResponse { recipients }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}/chat-history",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Target user's conversations"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn user_chat_history(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match chat_service.list(path.into_inner()).await {
        Ok(history) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "history": history }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}/chat-history/{history_id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "User id"),
        ("history_id" = i64, Path, description = "Conversation id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Conversation deleted"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn delete_user_chat(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;
    let (user_id, history_id) = path.into_inner();

    match chat_service.delete(user_id, history_id, Some(ctx.user_id)).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}/chat-history",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All conversations deleted"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn delete_all_user_chat(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = require_admin(&req)?;

    match chat_service.delete_all(path.into_inner(), Some(ctx.user_id)).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": deleted }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users/{id}/activity",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "User id"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Activity trail"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn user_activity(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    require_admin(&req)?;
    let params = PaginationParams::new(query.page, query.per_page);

    match admin_service.user_activity(path.into_inner(), &params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/analytics/summary",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Revenue rollup", body = AnalyticsSummary),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn analytics_summary(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.analytics_summary().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/analytics/transactions",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Most recent revenue records"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn recent_transactions(
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    require_admin(&req)?;

    match admin_service.recent_transactions(10).await {
        Ok(transactions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "transactions": transactions }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_users))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}/blocked", web::put().to(set_blocked))
            .route("/users/{id}/force-logout", web::post().to(force_logout))
            .route("/users/{id}/credits/add", web::post().to(add_credits))
            .route("/users/{id}/credits/remove", web::post().to(remove_credits))
            .route("/users/{id}/chat-history", web::get().to(user_chat_history))
            .route("/users/{id}/chat-history", web::delete().to(delete_all_user_chat))
            .route(
                "/users/{id}/chat-history/{history_id}",
                web::delete().to(delete_user_chat),
            )
            .route("/users/{id}/activity", web::get().to(user_activity))
            .route("/payment-requests", web::get().to(pending_payment_requests))
            .route(
                "/payment-requests/{id}/approve",
                web::post().to(approve_payment_request),
            )
            .route(
                "/payment-requests/{id}/reject",
                web::post().to(reject_payment_request),
            )
            .route("/broadcast", web::post().to(broadcast))
            .route("/analytics/summary", web::get().to(analytics_summary))
            .route("/analytics/transactions", web::get().to(recent_transactions)),
    );
}
