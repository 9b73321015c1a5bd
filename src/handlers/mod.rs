pub mod admin;
pub mod auth;
pub mod chat;
pub mod events;
pub mod notifications;
pub mod payments;
pub mod realtime;
pub mod rewards;
pub mod subscription;

pub use admin::admin_config;
pub use auth::auth_config;
pub use chat::chat_config;
pub use events::events_config;
pub use notifications::notifications_config;
pub use payments::payments_config;
pub use realtime::realtime_config;
pub use rewards::rewards_config;
pub use subscription::subscription_config;
