use crate::middlewares::auth_context;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/payments/requests",
    tag = "payments",
    request_body = CreatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request submitted for review", body = PaymentRequestResponse),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_request(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match payment_service
        .create_request(ctx.user_id, &ctx.email, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Payment request submitted. You will be notified once it is reviewed."
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/requests",
    tag = "payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own payment requests, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn my_requests(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match payment_service.my_requests(ctx.user_id).await {
        Ok(requests) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "requests": requests }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payments_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/requests", web::post().to(create_request))
            .route("/requests", web::get().to(my_requests)),
    );
}
