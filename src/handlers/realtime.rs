use crate::middlewares::auth_context;
use crate::realtime::{EventHub, RealtimeEvent};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use futures_util::stream;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Heartbeat comment interval; lets clients and proxies notice a dead
/// connection without any event traffic.
const KEEP_ALIVE_SECS: u64 = 15;

fn sse_frame(event: &RealtimeEvent) -> web::Bytes {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    web::Bytes::from(format!("event: {}\ndata: {}\n\n", event.kind(), data))
}

/// Server-sent event stream scoped to the authenticated user. The hub only
/// delivers this user's events plus global broadcasts, so no client can
/// observe another account's traffic. Push here is best-effort; the regular
/// REST endpoints stay authoritative.
#[utoipa::path(
    get,
    path = "/realtime/stream",
    tag = "realtime",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "text/event-stream of account events"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn stream(hub: web::Data<EventHub>, req: HttpRequest) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    let rx = hub.subscribe(ctx.user_id);

    log::debug!("Realtime stream opened for user {}", ctx.user_id);

    let events = stream::unfold(rx, |mut rx: mpsc::Receiver<RealtimeEvent>| async move {
        match timeout(Duration::from_secs(KEEP_ALIVE_SECS), rx.recv()).await {
            Ok(Some(event)) => Some((Ok::<_, std::convert::Infallible>(sse_frame(&event)), rx)),
            // Hub dropped the sender; end the stream
            Ok(None) => None,
            // Quiet interval - emit a comment so the connection stays warm
            Err(_) => Some((Ok(web::Bytes::from_static(b": keep-alive\n\n")), rx)),
        }
    });

    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(events))
}

pub fn realtime_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/realtime").route("/stream", web::get().to(stream)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;

    #[test]
    fn test_sse_frame_shape() {
        let frame = sse_frame(&RealtimeEvent::Broadcast {
            user_id: None,
            title: "Hello".to_string(),
            message: "World".to_string(),
            notification_type: NotificationType::Info,
        });
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("event: broadcast\n"));
        assert!(text.contains("data: {"));
        assert!(text.ends_with("\n\n"));
    }
}
