use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error payload embedded in every failed response:
/// `{"success": false, "error": {code, message}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
