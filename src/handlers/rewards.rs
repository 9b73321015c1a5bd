use crate::middlewares::auth_context;
use crate::models::*;
use crate::services::RewardService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/rewards/status",
    tag = "rewards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Daily reward eligibility", body = RewardStatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn status(
    reward_service: web::Data<RewardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match reward_service.status(ctx.user_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/rewards/claim",
    tag = "rewards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reward granted", body = DailyRewardResponse),
        (status = 400, description = "Cooldown active"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn claim(
    reward_service: web::Data<RewardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match reward_service.claim_daily(ctx.user_id).await {
        Ok(reward) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "reward": reward }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/rewards/history",
    tag = "rewards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent claims"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn history(
    reward_service: web::Data<RewardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match reward_service.history(ctx.user_id).await {
        Ok(rewards) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "rewards": rewards }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/rewards/coupons",
    tag = "rewards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unused, unexpired coupons"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn coupons(
    reward_service: web::Data<RewardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match reward_service.list_coupons(ctx.user_id).await {
        Ok(coupons) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "coupons": coupons }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/rewards/coupons/redeem",
    tag = "rewards",
    request_body = RedeemCouponRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Coupon redeemed", body = RedeemCouponResponse),
        (status = 400, description = "Used or expired coupon"),
        (status = 404, description = "Unknown code"),
        (status = 409, description = "Lost redemption race")
    )
)]
pub async fn redeem_coupon(
    reward_service: web::Data<RewardService>,
    req: HttpRequest,
    request: web::Json<RedeemCouponRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match reward_service.redeem_coupon(ctx.user_id, &request.code).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn rewards_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rewards")
            .route("/status", web::get().to(status))
            .route("/claim", web::post().to(claim))
            .route("/history", web::get().to(history))
            .route("/coupons", web::get().to(coupons))
            .route("/coupons/redeem", web::post().to(redeem_coupon)),
    );
}
