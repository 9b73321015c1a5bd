use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use vyaas_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::MailerService,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    realtime::EventHub,
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 实时事件中心与外部邮件服务
    let hub = EventHub::new();
    let mailer_service = MailerService::new(config.mailer.clone());
    if !mailer_service.is_enabled() {
        log::warn!("Mailer endpoint not configured; decision emails are disabled");
    }

    // 创建服务
    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        config.admin.emails.clone(),
    );
    let subscription_service = SubscriptionService::new(pool.clone(), hub.clone());
    let reward_service = RewardService::new(pool.clone(), hub.clone());
    let event_service = EventService::new(pool.clone(), hub.clone());
    let notification_service = NotificationService::new(pool.clone(), hub.clone());
    let chat_service = ChatService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone(), hub.clone(), mailer_service.clone());
    let admin_service = AdminService::new(pool.clone(), hub.clone());

    // 启动后台任务 (账本对账 + 过期数据清理)
    tasks::spawn_all(pool.clone(), subscription_service.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(hub.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(reward_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::subscription_config)
                    .configure(handlers::rewards_config)
                    .configure(handlers::events_config)
                    .configure(handlers::payments_config)
                    .configure(handlers::notifications_config)
                    .configure(handlers::chat_config)
                    .configure(handlers::realtime_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
