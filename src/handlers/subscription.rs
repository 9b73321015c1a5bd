use crate::middlewares::auth_context;
use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/subscription",
    tag = "subscription",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current plan and balances", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match subscription_service.get_subscription(ctx.user_id, &ctx.email).await {
        Ok(subscription) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscription
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/subscription/deduct",
    tag = "subscription",
    request_body = DeductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Action funded", body = DeductResponse),
        (status = 400, description = "Insufficient credits"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account blocked")
    )
)]
pub async fn deduct(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    request: web::Json<DeductRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    let request = request.into_inner();

    match subscription_service
        .deduct_for_action(ctx.user_id, &ctx.email, request.action, &request.reason)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscription/credit-logs",
    tag = "subscription",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ledger entries, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn credit_logs(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    query: web::Query<CreditLogQuery>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    let params = PaginationParams::new(query.page, query.per_page);

    match subscription_service.get_credit_logs(ctx.user_id, &params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription")
            .route("", web::get().to(get_subscription))
            .route("/deduct", web::post().to(deduct))
            .route("/credit-logs", web::get().to(credit_logs)),
    );
}
