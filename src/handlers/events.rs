use crate::middlewares::auth_context;
use crate::models::*;
use crate::services::EventService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/events/spin/status",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Spin cooldown state", body = SpinStatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn spin_status(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.spin_status(ctx.user_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/spin",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wheel spun", body = SpinResponse),
        (status = 400, description = "Cooldown active"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn spin(event_service: web::Data<EventService>, req: HttpRequest) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.spin(ctx.user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/mystery-box",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Box opened", body = MysteryBoxResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn mystery_box(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.open_mystery_box(ctx.user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/dice/status",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dice cooldown state", body = DiceStatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dice_status(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.dice_status(ctx.user_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/dice/roll",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dice rolled", body = DiceRollResponse),
        (status = 400, description = "Cooldown active"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn roll_dice(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.roll_dice(ctx.user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/streak",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Streak state", body = StreakStatusResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn streak_status(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.streak_status(ctx.user_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/streak/claim",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Streak extended", body = StreakClaimResponse),
        (status = 400, description = "Already claimed today"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn claim_streak(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.claim_streak(ctx.user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/boss",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active boss", body = BossStatusResponse),
        (status = 404, description = "No active boss")
    )
)]
pub async fn boss_status(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    auth_context(&req)?;

    match event_service.boss_status().await {
        Ok(boss) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": boss
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/boss/attack",
    tag = "events",
    request_body = AttackBossRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Damage applied", body = AttackBossResponse),
        (status = 400, description = "Damage out of range"),
        (status = 404, description = "No active boss"),
        (status = 409, description = "Boss already defeated")
    )
)]
pub async fn attack_boss(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<AttackBossRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.attack_boss(ctx.user_id, request.damage).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/market",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active market items"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn market_items(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    auth_context(&req)?;

    match event_service.market_items().await {
        Ok(items) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "items": items }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events/market/purchase",
    tag = "events",
    request_body = PurchaseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item purchased", body = PurchaseResponse),
        (status = 400, description = "Insufficient funds"),
        (status = 404, description = "Unknown item")
    )
)]
pub async fn purchase(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<PurchaseRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.purchase(ctx.user_id, request.item_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/inventory",
    tag = "events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Owned items"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn inventory(
    event_service: web::Data<EventService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match event_service.inventory(ctx.user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "items": items }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn events_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("/spin/status", web::get().to(spin_status))
            .route("/spin", web::post().to(spin))
            .route("/mystery-box", web::post().to(mystery_box))
            .route("/dice/status", web::get().to(dice_status))
            .route("/dice/roll", web::post().to(roll_dice))
            .route("/streak", web::get().to(streak_status))
            .route("/streak/claim", web::post().to(claim_streak))
            .route("/boss", web::get().to(boss_status))
            .route("/boss/attack", web::post().to(attack_boss))
            .route("/market", web::get().to(market_items))
            .route("/market/purchase", web::post().to(purchase))
            .route("/inventory", web::get().to(inventory)),
    );
}
