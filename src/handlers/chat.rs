use crate::middlewares::auth_context;
use crate::models::*;
use crate::services::ChatService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/chat/history",
    tag = "chat",
    request_body = SaveChatRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transcript saved (empty transcripts are ignored)"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn save(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
    request: web::Json<SaveChatRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match chat_service.save(ctx.user_id, request.into_inner().messages).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "history": saved }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/chat/history",
    tag = "chat",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own conversations, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(chat_service: web::Data<ChatService>, req: HttpRequest) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match chat_service.list(ctx.user_id).await {
        Ok(history) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "history": history }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/chat/history/{id}",
    tag = "chat",
    params(("id" = i64, Path, description = "Conversation id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Conversation deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match chat_service.delete(ctx.user_id, path.into_inner(), None).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/chat/history",
    tag = "chat",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All conversations deleted"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_all(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;

    match chat_service.delete_all(ctx.user_id, None).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": deleted }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn chat_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/chat")
            .route("/history", web::post().to(save))
            .route("/history", web::get().to(list))
            .route("/history", web::delete().to(delete_all))
            .route("/history/{id}", web::delete().to(delete)),
    );
}
