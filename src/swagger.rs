use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::session,
        handlers::auth::me,
        handlers::subscription::get_subscription,
        handlers::subscription::deduct,
        handlers::subscription::credit_logs,
        handlers::rewards::status,
        handlers::rewards::claim,
        handlers::rewards::history,
        handlers::rewards::coupons,
        handlers::rewards::redeem_coupon,
        handlers::events::spin_status,
        handlers::events::spin,
        handlers::events::mystery_box,
        handlers::events::dice_status,
        handlers::events::roll_dice,
        handlers::events::streak_status,
        handlers::events::claim_streak,
        handlers::events::boss_status,
        handlers::events::attack_boss,
        handlers::events::market_items,
        handlers::events::purchase,
        handlers::events::inventory,
        handlers::payments::create_request,
        handlers::payments::my_requests,
        handlers::notifications::list,
        handlers::notifications::unread,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::delete,
        handlers::chat::save,
        handlers::chat::list,
        handlers::chat::delete,
        handlers::chat::delete_all,
        handlers::realtime::stream,
        handlers::admin::list_users,
        handlers::admin::get_user,
        handlers::admin::set_blocked,
        handlers::admin::force_logout,
        handlers::admin::add_credits,
        handlers::admin::remove_credits,
        handlers::admin::pending_payment_requests,
        handlers::admin::approve_payment_request,
        handlers::admin::reject_payment_request,
        handlers::admin::broadcast,
        handlers::admin::user_chat_history,
        handlers::admin::delete_user_chat,
        handlers::admin::delete_all_user_chat,
        handlers::admin::user_activity,
        handlers::admin::analytics_summary,
        handlers::admin::recent_transactions,
    ),
    components(
        schemas(
            Role,
            PlanType,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AuthResponse,
            UserResponse,
            SessionStatusResponse,
            ActionKind,
            FundingSource,
            DeductRequest,
            DeductResponse,
            SubscriptionResponse,
            CreditLogResponse,
            RewardType,
            RewardStatusResponse,
            DailyRewardResponse,
            CouponResponse,
            RedeemCouponRequest,
            RedeemCouponResponse,
            EventCurrency,
            BossStatus,
            WheelRewardKind,
            WonWheelReward,
            SpinStatusResponse,
            SpinResponse,
            MysteryBoxResponse,
            DiceStatusResponse,
            DiceRollResponse,
            StreakStatusResponse,
            StreakMilestone,
            StreakClaimResponse,
            BossStatusResponse,
            AttackBossRequest,
            AttackBossResponse,
            MarketItemResponse,
            PurchaseRequest,
            PurchaseResponse,
            InventoryItemResponse,
            PaymentStatus,
            CreatePaymentRequest,
            PaymentRequestResponse,
            NotificationType,
            NotificationResponse,
            SaveChatRequest,
            ChatHistoryResponse,
            AdminUserResponse,
            SetBlockedRequest,
            AdjustCreditsRequest,
            BroadcastRequest,
            BroadcastResponse,
            AnalyticsSummary,
            TransactionResponse,
            ActivityLogResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "subscription", description = "Plan, credits and token buckets"),
        (name = "rewards", description = "Daily reward and coupons"),
        (name = "events", description = "Crazy Winter event engines"),
        (name = "payments", description = "Payment requests (manual approval)"),
        (name = "notifications", description = "Per-user inbox"),
        (name = "chat", description = "Conversation history"),
        (name = "realtime", description = "Server-sent event stream"),
        (name = "admin", description = "Back office (admin role required)"),
    ),
    info(
        title = "Vyaas Backend API",
        version = "1.0.0",
        description = "Vyaas AI assistant backend REST API documentation",
        contact(
            name = "API Support",
            email = "support@vyaas.app"
        )
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
