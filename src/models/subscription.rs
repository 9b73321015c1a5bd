use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum PlanType {
    #[sea_orm(string_value = "free")]
    #[serde(rename = "free")]
    Free,
    #[sea_orm(string_value = "pro")]
    #[serde(rename = "pro")]
    Pro,
    #[sea_orm(string_value = "ultra")]
    #[serde(rename = "ultra")]
    Ultra,
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanType::Free => write!(f, "free"),
            PlanType::Pro => write!(f, "pro"),
            PlanType::Ultra => write!(f, "ultra"),
        }
    }
}

pub struct Plan {
    pub name: &'static str,
    /// Price in INR.
    pub price: i64,
    /// Credits granted when the plan is activated.
    pub credits: i64,
    /// Voice session limit in seconds. `None` means unlimited.
    pub session_limit_secs: Option<i64>,
}

impl PlanType {
    pub fn details(&self) -> Plan {
        match self {
            PlanType::Free => Plan {
                name: "Free",
                price: 0,
                credits: 100,
                session_limit_secs: Some(5 * 60),
            },
            PlanType::Pro => Plan {
                name: "Pro",
                price: 99,
                credits: 500,
                session_limit_secs: Some(10 * 60 * 60),
            },
            PlanType::Ultra => Plan {
                name: "Ultra",
                price: 299,
                credits: 2000,
                session_limit_secs: None,
            },
        }
    }
}

/// Credits granted to a brand-new account.
pub const SIGNUP_CREDITS: i64 = 100;

/// Billable actions. Costs live here, server-side; clients request an action
/// and never supply an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ChatMessage,
    ImageGeneration,
    CodeGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Image,
    Code,
}

impl ActionKind {
    pub fn cost(&self) -> i64 {
        match self {
            ActionKind::ChatMessage => 2,
            ActionKind::ImageGeneration => 20,
            ActionKind::CodeGeneration => 20,
        }
    }

    /// The dedicated token bucket that funds this action before generic
    /// credits are touched. Token spend is always exactly 1, whatever the
    /// nominal credit cost.
    pub fn token_bucket(&self) -> Option<TokenKind> {
        match self {
            ActionKind::ChatMessage => None,
            ActionKind::ImageGeneration => Some(TokenKind::Image),
            ActionKind::CodeGeneration => Some(TokenKind::Code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    ImageToken,
    CodeToken,
    Credits,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeductRequest {
    pub action: ActionKind,
    #[schema(example = "Image generation: sunset over mountains")]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeductResponse {
    pub funded_by: FundingSource,
    pub cost: i64,
    pub credits: i64,
    pub image_tokens: i64,
    pub code_tokens: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub email: String,
    pub credits: i64,
    pub plan_type: PlanType,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub image_tokens: i64,
    pub code_tokens: i64,
}

impl From<crate::entities::user_entity::Model> for SubscriptionResponse {
    fn from(user: crate::entities::user_entity::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            credits: user.credits,
            plan_type: user.plan_type,
            subscription_end_date: user.subscription_end_date,
            image_tokens: user.image_tokens,
            code_tokens: user.code_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_costs() {
        assert_eq!(ActionKind::ChatMessage.cost(), 2);
        assert_eq!(ActionKind::ImageGeneration.cost(), 20);
        assert_eq!(ActionKind::CodeGeneration.cost(), 20);
    }

    #[test]
    fn test_token_buckets() {
        assert_eq!(ActionKind::ChatMessage.token_bucket(), None);
        assert_eq!(ActionKind::ImageGeneration.token_bucket(), Some(TokenKind::Image));
        assert_eq!(ActionKind::CodeGeneration.token_bucket(), Some(TokenKind::Code));
    }

    #[test]
    fn test_plan_details() {
        assert_eq!(PlanType::Free.details().credits, 100);
        assert_eq!(PlanType::Pro.details().price, 99);
        assert!(PlanType::Ultra.details().session_limit_secs.is_none());
    }
}
