pub mod activity_logs;
pub mod boss_damages;
pub mod boss_fights;
pub mod chat_histories;
pub mod coupons;
pub mod credit_logs;
pub mod daily_rewards;
pub mod inventory_items;
pub mod market_items;
pub mod notifications;
pub mod payment_requests;
pub mod session_revocations;
pub mod streaks;
pub mod transactions;
pub mod users;

pub use activity_logs as activity_log_entity;
pub use boss_damages as boss_damage_entity;
pub use boss_fights as boss_fight_entity;
pub use chat_histories as chat_history_entity;
pub use coupons as coupon_entity;
pub use credit_logs as credit_log_entity;
pub use daily_rewards as daily_reward_entity;
pub use inventory_items as inventory_item_entity;
pub use market_items as market_item_entity;
pub use notifications as notification_entity;
pub use payment_requests as payment_request_entity;
pub use session_revocations as session_revocation_entity;
pub use streaks as streak_entity;
pub use transactions as transaction_entity;
pub use users as user_entity;
