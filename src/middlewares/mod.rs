pub mod auth;
pub mod cors;

pub use auth::{AuthContext, AuthMiddleware, auth_context, require_admin};
pub use cors::create_cors;
