use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event currencies for the Crazy Winter module. They live on the users row
/// next to credits but are never interchangeable with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum EventCurrency {
    #[sea_orm(string_value = "snowflakes")]
    #[serde(rename = "snowflakes")]
    Snowflakes,
    #[sea_orm(string_value = "ice_coins")]
    #[serde(rename = "ice_coins")]
    IceCoins,
    #[sea_orm(string_value = "winter_tokens")]
    #[serde(rename = "winter_tokens")]
    WinterTokens,
}

impl std::fmt::Display for EventCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCurrency::Snowflakes => write!(f, "snowflakes"),
            EventCurrency::IceCoins => write!(f, "ice_coins"),
            EventCurrency::WinterTokens => write!(f, "winter_tokens"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum BossStatus {
    #[sea_orm(string_value = "active")]
    #[serde(rename = "active")]
    Active,
    #[sea_orm(string_value = "defeated")]
    #[serde(rename = "defeated")]
    Defeated,
}

// ---------------------------------------------------------------------------
// Spin wheel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WheelRewardKind {
    Coupon,
    ImageToken,
    CodeToken,
}

#[derive(Debug, Clone, Copy)]
pub struct WheelEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: WheelRewardKind,
    /// Coupon discount percent, or 1 for token rewards.
    pub value: i64,
    /// Weight in basis points. The sampler normalizes against the actual
    /// table total, so the table stays correct even if an edit makes the
    /// weights no longer sum to 10000.
    pub weight_bp: i64,
}

pub const WHEEL_REWARDS: [WheelEntry; 8] = [
    WheelEntry { id: "coupon_40", label: "40% OFF", kind: WheelRewardKind::Coupon, value: 40, weight_bp: 3000 },
    WheelEntry { id: "coupon_60", label: "60% OFF", kind: WheelRewardKind::Coupon, value: 60, weight_bp: 2000 },
    WheelEntry { id: "coupon_75", label: "75% OFF", kind: WheelRewardKind::Coupon, value: 75, weight_bp: 1500 },
    WheelEntry { id: "coupon_80", label: "80% OFF", kind: WheelRewardKind::Coupon, value: 80, weight_bp: 1000 },
    WheelEntry { id: "coupon_90", label: "90% OFF", kind: WheelRewardKind::Coupon, value: 90, weight_bp: 500 },
    WheelEntry { id: "coupon_98", label: "98% OFF", kind: WheelRewardKind::Coupon, value: 98, weight_bp: 100 },
    WheelEntry { id: "image_token", label: "Image Token", kind: WheelRewardKind::ImageToken, value: 1, weight_bp: 1000 },
    WheelEntry { id: "code_token", label: "Code Token", kind: WheelRewardKind::CodeToken, value: 1, weight_bp: 900 },
];

pub fn total_weight(entries: &[WheelEntry]) -> i64 {
    entries.iter().map(|e| e.weight_bp).sum()
}

/// Cumulative weighted pick. `draw` must be in `0..total_weight(entries)`;
/// the first entry whose cumulative weight exceeds the draw wins. If
/// rounding ever leaves a residue the last entry is the defined default, so
/// a draw can never fall through without a result.
pub fn pick_weighted(entries: &[WheelEntry], draw: i64) -> &WheelEntry {
    let mut acc = 0;
    for entry in entries {
        acc += entry.weight_bp;
        if draw < acc {
            return entry;
        }
    }
    // 理论上不可达 (draw < total), kept as the explicit default
    &entries[entries.len() - 1]
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WonWheelReward {
    pub id: String,
    pub label: String,
    pub kind: WheelRewardKind,
    pub value: i64,
    /// Set when the win produced a coupon row.
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpinStatusResponse {
    pub can_spin: bool,
    pub next_spin_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpinResponse {
    pub reward: WonWheelReward,
}

// ---------------------------------------------------------------------------
// Mystery box / dice / streak
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct MysteryBoxResponse {
    pub reward_currency: EventCurrency,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiceStatusResponse {
    pub can_roll: bool,
    pub next_roll_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiceRollResponse {
    pub roll: i64,
    pub reward: i64,
    pub is_double: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StreakStatusResponse {
    pub current_streak: i64,
    pub last_claim_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StreakMilestone {
    pub currency: EventCurrency,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StreakClaimResponse {
    pub current_streak: i64,
    pub milestone: Option<StreakMilestone>,
}

// ---------------------------------------------------------------------------
// Boss fight
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct BossStatusResponse {
    pub id: i64,
    pub name: String,
    pub max_hp: i64,
    pub current_hp: i64,
    pub status: BossStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttackBossRequest {
    pub damage: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttackBossResponse {
    pub defeated: bool,
    pub current_hp: i64,
    pub total_damage_dealt: i64,
}

// ---------------------------------------------------------------------------
// Winter market
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct MarketItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cost_currency: EventCurrency,
    pub cost_amount: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    pub item_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub item: MarketItemResponse,
    pub balance_remaining: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryItemResponse {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub acquired_at: DateTime<Utc>,
}

impl From<crate::entities::boss_fight_entity::Model> for BossStatusResponse {
    fn from(b: crate::entities::boss_fight_entity::Model) -> Self {
        Self {
            id: b.id,
            name: b.name,
            max_hp: b.max_hp,
            current_hp: b.current_hp,
            status: b.status,
        }
    }
}

impl From<crate::entities::market_item_entity::Model> for MarketItemResponse {
    fn from(item: crate::entities::market_item_entity::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            cost_currency: item.cost_currency,
            cost_amount: item.cost_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_wheel_weights_sum_to_ten_thousand() {
        assert_eq!(total_weight(&WHEEL_REWARDS), 10_000);
    }

    #[test]
    fn test_pick_first_entry_at_zero() {
        let entry = pick_weighted(&WHEEL_REWARDS, 0);
        assert_eq!(entry.id, "coupon_40");
    }

    #[test]
    fn test_pick_respects_boundaries() {
        // 2999 is the last draw inside the first entry, 3000 the first of the next
        assert_eq!(pick_weighted(&WHEEL_REWARDS, 2999).id, "coupon_40");
        assert_eq!(pick_weighted(&WHEEL_REWARDS, 3000).id, "coupon_60");
    }

    #[test]
    fn test_draw_at_99_percent_resolves_to_last_entry() {
        // 0.99 of the full table lands inside the final entry's band
        let draw = (0.99 * total_weight(&WHEEL_REWARDS) as f64) as i64;
        assert_eq!(pick_weighted(&WHEEL_REWARDS, draw).id, "code_token");
    }

    #[test]
    fn test_max_draw_resolves_to_last_entry() {
        let draw = total_weight(&WHEEL_REWARDS) - 1;
        assert_eq!(pick_weighted(&WHEEL_REWARDS, draw).id, "code_token");
    }

    #[test]
    fn test_sampler_normalizes_against_actual_total() {
        // A table that does not sum to 10000 must still cover every draw
        let table = [
            WheelEntry { id: "a", label: "A", kind: WheelRewardKind::Coupon, value: 10, weight_bp: 100 },
            WheelEntry { id: "b", label: "B", kind: WheelRewardKind::Coupon, value: 20, weight_bp: 300 },
        ];
        assert_eq!(total_weight(&table), 400);
        assert_eq!(pick_weighted(&table, 99).id, "a");
        assert_eq!(pick_weighted(&table, 100).id, "b");
        assert_eq!(pick_weighted(&table, 399).id, "b");
    }

    #[test]
    fn test_distribution_converges() {
        let mut rng = rand::thread_rng();
        let total = total_weight(&WHEEL_REWARDS);
        let trials = 20_000;
        let mut counts = [0u32; WHEEL_REWARDS.len()];

        for _ in 0..trials {
            let draw = rng.gen_range(0..total);
            let picked = pick_weighted(&WHEEL_REWARDS, draw);
            let idx = WHEEL_REWARDS.iter().position(|e| e.id == picked.id).unwrap();
            counts[idx] += 1;
        }

        for (i, entry) in WHEEL_REWARDS.iter().enumerate() {
            let expected = entry.weight_bp as f64 / total as f64;
            let observed = counts[i] as f64 / trials as f64;
            assert!(
                (observed - expected).abs() < 0.025,
                "entry {} observed {} expected {}",
                entry.id,
                observed,
                expected
            );
        }
    }
}
