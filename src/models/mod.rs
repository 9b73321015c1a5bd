pub mod admin;
pub mod chat;
pub mod common;
pub mod event;
pub mod ledger;
pub mod notification;
pub mod pagination;
pub mod payment;
pub mod reward;
pub mod subscription;
pub mod user;

pub use admin::*;
pub use chat::*;
pub use common::*;
pub use event::*;
pub use ledger::*;
pub use notification::*;
pub use pagination::*;
pub use payment::*;
pub use reward::*;
pub use subscription::*;
pub use user::*;
