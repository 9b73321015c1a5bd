use crate::entities::{
    boss_damage_entity as boss_damages, boss_fight_entity as boss_fights,
    coupon_entity as coupons, inventory_item_entity as inventory_items,
    market_item_entity as market_items, streak_entity as streaks, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AttackBossResponse, BossStatus, BossStatusResponse, DiceRollResponse, DiceStatusResponse,
    EventCurrency, InventoryItemResponse, MarketItemResponse, MysteryBoxResponse,
    NotificationType, PurchaseResponse, SpinResponse, SpinStatusResponse, StreakClaimResponse,
    StreakMilestone, StreakStatusResponse, WHEEL_REWARDS, WheelRewardKind, WonWheelReward,
    pick_weighted, total_weight,
};
use crate::realtime::{EventHub, RealtimeEvent};
use crate::services::audit::record_activity;
use crate::services::notification_service::insert_notification;
use crate::utils::generate_coupon_code;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::json;

const SPIN_WINDOW_HOURS: i64 = 5;
const DICE_WINDOW_HOURS: i64 = 12;
const SPIN_COUPON_VALIDITY_DAYS: i64 = 30;
/// Damage per attack is capped; anything above is a tampered client.
const MAX_ATTACK_DAMAGE: i64 = 1000;
/// Paid to every damage contributor when the boss falls.
const BOSS_DEFEAT_REWARD_TOKENS: i64 = 5;

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
    hub: EventHub,
}

impl EventService {
    pub fn new(pool: DatabaseConnection, hub: EventHub) -> Self {
        Self { pool, hub }
    }

    // -----------------------------
    // Spin wheel
    // -----------------------------

    pub async fn spin_status(&self, user_id: i64) -> AppResult<SpinStatusResponse> {
        let user = self.fetch_user(user_id).await?;
        let now = Utc::now();
        let can_spin =
            crate::services::cooldown_elapsed(user.last_spin_time, now, SPIN_WINDOW_HOURS);

        Ok(SpinStatusResponse {
            can_spin,
            next_spin_time: user
                .last_spin_time
                .map(|last| last + Duration::hours(SPIN_WINDOW_HOURS))
                .filter(|_| !can_spin),
        })
    }

    /// Spin the wheel. The cooldown stamp is a conditional update so two
    /// racing spins cannot both win, and the stamp plus the grant commit
    /// together. Coupon wins mint a real coupon row rather than just a
    /// notification.
    pub async fn spin(&self, user_id: i64) -> AppResult<SpinResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let user = self.fetch_user_tx(&txn, user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        self.take_cooldown(
            &txn,
            user_id,
            users::Column::LastSpinTime,
            SPIN_WINDOW_HOURS,
            "Spin cooldown active",
        )
        .await?;

        let draw = { rand::thread_rng().gen_range(0..total_weight(&WHEEL_REWARDS)) };
        let entry = *pick_weighted(&WHEEL_REWARDS, draw);

        let coupon_code = match entry.kind {
            WheelRewardKind::ImageToken => {
                users::Entity::update_many()
                    .col_expr(
                        users::Column::ImageTokens,
                        Expr::col(users::Column::ImageTokens).add(1),
                    )
                    .filter(users::Column::Id.eq(user_id))
                    .exec(&txn)
                    .await?;
                None
            }
            WheelRewardKind::CodeToken => {
                users::Entity::update_many()
                    .col_expr(
                        users::Column::CodeTokens,
                        Expr::col(users::Column::CodeTokens).add(1),
                    )
                    .filter(users::Column::Id.eq(user_id))
                    .exec(&txn)
                    .await?;
                None
            }
            WheelRewardKind::Coupon => {
                let code = generate_coupon_code();
                coupons::ActiveModel {
                    code: Set(code.clone()),
                    user_id: Set(user_id),
                    discount_percent: Set(entry.value as i32),
                    is_used: Set(false),
                    expires_at: Set(now + Duration::days(SPIN_COUPON_VALIDITY_DAYS)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                insert_notification(
                    &txn,
                    user_id,
                    "You won a coupon!".to_string(),
                    format!("Congratulations! You won a {} coupon. Code: {code}", entry.label),
                    NotificationType::Success,
                )
                .await?;
                Some(code)
            }
        };

        record_activity(
            &txn,
            user_id,
            "spin_wheel",
            json!({ "reward": entry.id, "label": entry.label }),
            0,
        )
        .await?;

        txn.commit().await?;

        self.hub.publish(RealtimeEvent::Reward {
            user_id,
            engine: "spin_wheel".to_string(),
            description: format!("Spin wheel: {}", entry.label),
        });

        Ok(SpinResponse {
            reward: WonWheelReward {
                id: entry.id.to_string(),
                label: entry.label.to_string(),
                kind: entry.kind,
                value: entry.value,
                coupon_code,
            },
        })
    }

    // -----------------------------
    // Mystery box
    // -----------------------------

    /// No cooldown by design; the box costs nothing and pays event currency
    /// only.
    pub async fn open_mystery_box(&self, user_id: i64) -> AppResult<MysteryBoxResponse> {
        let user = self.fetch_user(user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        let draw = { rand::thread_rng().gen_range(0.0..1.0) };
        let (currency, amount) = mystery_reward(draw);

        self.grant_event_currency(&self.pool, user_id, currency, amount).await?;

        record_activity(
            &self.pool,
            user_id,
            "mystery_box",
            json!({ "currency": currency, "amount": amount }),
            0,
        )
        .await?;

        self.hub.publish(RealtimeEvent::Reward {
            user_id,
            engine: "mystery_box".to_string(),
            description: format!("Mystery box: {amount} {currency}"),
        });

        Ok(MysteryBoxResponse {
            reward_currency: currency,
            amount,
        })
    }

    // -----------------------------
    // Snow dice
    // -----------------------------

    pub async fn dice_status(&self, user_id: i64) -> AppResult<DiceStatusResponse> {
        let user = self.fetch_user(user_id).await?;
        let now = Utc::now();
        let can_roll =
            crate::services::cooldown_elapsed(user.last_dice_roll, now, DICE_WINDOW_HOURS);

        Ok(DiceStatusResponse {
            can_roll,
            next_roll_time: user
                .last_dice_roll
                .map(|last| last + Duration::hours(DICE_WINDOW_HOURS))
                .filter(|_| !can_roll),
        })
    }

    pub async fn roll_dice(&self, user_id: i64) -> AppResult<DiceRollResponse> {
        let txn = self.pool.begin().await?;

        let user = self.fetch_user_tx(&txn, user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        self.take_cooldown(
            &txn,
            user_id,
            users::Column::LastDiceRoll,
            DICE_WINDOW_HOURS,
            "Dice cooldown active",
        )
        .await?;

        let (roll, is_double) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(1..=6), rng.gen_bool(0.1))
        };
        let reward = dice_reward(roll, is_double);

        self.grant_event_currency(&txn, user_id, EventCurrency::Snowflakes, reward).await?;

        record_activity(
            &txn,
            user_id,
            "dice_roll",
            json!({ "roll": roll, "reward": reward, "is_double": is_double }),
            0,
        )
        .await?;

        txn.commit().await?;

        self.hub.publish(RealtimeEvent::Reward {
            user_id,
            engine: "snow_dice".to_string(),
            description: format!("Dice roll {roll}: {reward} snowflakes"),
        });

        Ok(DiceRollResponse {
            roll,
            reward,
            is_double,
        })
    }

    // -----------------------------
    // Heat-up combo (streak)
    // -----------------------------

    pub async fn streak_status(&self, user_id: i64) -> AppResult<StreakStatusResponse> {
        let streak = streaks::Entity::find()
            .filter(streaks::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;

        Ok(match streak {
            Some(s) => StreakStatusResponse {
                current_streak: s.current_streak,
                last_claim_date: s.last_claim_date,
            },
            None => StreakStatusResponse {
                current_streak: 0,
                last_claim_date: None,
            },
        })
    }

    /// One claim per UTC calendar day. The day gate is a conditional update
    /// against the stored claim date.
    pub async fn claim_streak(&self, user_id: i64) -> AppResult<StreakClaimResponse> {
        let now = Utc::now();
        let day_start = start_of_utc_day(now);
        let txn = self.pool.begin().await?;

        let existing = streaks::Entity::find()
            .filter(streaks::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;

        let new_streak = match &existing {
            None => 1,
            Some(s) => match s.last_claim_date {
                Some(last) if last >= day_start => {
                    return Err(AppError::ValidationError(
                        "Streak already claimed today".to_string(),
                    ));
                }
                // A gap longer than one full day restarts the combo
                Some(last) if last < day_start - Duration::days(1) => 1,
                _ => s.current_streak + 1,
            },
        };

        match existing {
            Some(s) => {
                let result = streaks::Entity::update_many()
                    .col_expr(streaks::Column::CurrentStreak, Expr::value(new_streak))
                    .col_expr(streaks::Column::LastClaimDate, Expr::value(now))
                    .col_expr(streaks::Column::UpdatedAt, Expr::value(now))
                    .filter(streaks::Column::Id.eq(s.id))
                    .filter(
                        Condition::any()
                            .add(streaks::Column::LastClaimDate.is_null())
                            .add(streaks::Column::LastClaimDate.lt(day_start)),
                    )
                    .exec(&txn)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(AppError::ValidationError(
                        "Streak already claimed today".to_string(),
                    ));
                }
            }
            None => {
                streaks::ActiveModel {
                    user_id: Set(user_id),
                    current_streak: Set(new_streak),
                    last_claim_date: Set(Some(now)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        let milestone = streak_milestone(new_streak);
        if let Some((currency, amount)) = milestone {
            self.grant_event_currency(&txn, user_id, currency, amount).await?;
        }

        record_activity(
            &txn,
            user_id,
            "streak_claim",
            json!({ "streak": new_streak }),
            0,
        )
        .await?;

        txn.commit().await?;

        if let Some((currency, amount)) = milestone {
            self.hub.publish(RealtimeEvent::Reward {
                user_id,
                engine: "streak".to_string(),
                description: format!("Streak day {new_streak}: {amount} {currency}"),
            });
        }

        Ok(StreakClaimResponse {
            current_streak: new_streak,
            milestone: milestone.map(|(currency, amount)| StreakMilestone { currency, amount }),
        })
    }

    // -----------------------------
    // Boss fight
    // -----------------------------

    pub async fn boss_status(&self) -> AppResult<BossStatusResponse> {
        let boss = boss_fights::Entity::find()
            .filter(boss_fights::Column::Status.eq(BossStatus::Active))
            .order_by_desc(boss_fights::Column::CreatedAt)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No active boss".to_string()))?;
        Ok(boss.into())
    }

    /// Apply damage to the active boss. HP is clamped at zero in a single
    /// conditional update; whoever's conditional `active -> defeated`
    /// transition lands first pays out the contributors exactly once.
    pub async fn attack_boss(&self, user_id: i64, damage: i64) -> AppResult<AttackBossResponse> {
        if damage <= 0 || damage > MAX_ATTACK_DAMAGE {
            return Err(AppError::ValidationError(format!(
                "Damage must be between 1 and {MAX_ATTACK_DAMAGE}"
            )));
        }

        let txn = self.pool.begin().await?;

        let user = self.fetch_user_tx(&txn, user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        let boss = boss_fights::Entity::find()
            .filter(boss_fights::Column::Status.eq(BossStatus::Active))
            .order_by_desc(boss_fights::Column::CreatedAt)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("No active boss".to_string()))?;

        let result = boss_fights::Entity::update_many()
            .col_expr(
                boss_fights::Column::CurrentHp,
                Expr::cust_with_values("GREATEST(current_hp - ?, 0)", [damage]),
            )
            .col_expr(boss_fights::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(boss_fights::Column::Id.eq(boss.id))
            .filter(boss_fights::Column::Status.eq(BossStatus::Active))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::Conflict("Boss already defeated".to_string()));
        }

        let total_damage_dealt = self.record_damage(&txn, boss.id, user_id, damage).await?;

        let fresh = boss_fights::Entity::find_by_id(boss.id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::InternalError("Boss disappeared mid-fight".to_string()))?;

        let mut defeated = false;
        if fresh.current_hp == 0 {
            let transition = boss_fights::Entity::update_many()
                .col_expr(boss_fights::Column::Status, Expr::value(BossStatus::Defeated))
                .filter(boss_fights::Column::Id.eq(boss.id))
                .filter(boss_fights::Column::Status.eq(BossStatus::Active))
                .exec(&txn)
                .await?;

            // Only the request that wins the transition pays out
            if transition.rows_affected == 1 {
                defeated = true;
                self.reward_boss_contributors(&txn, boss.id, &boss.name).await?;
            }
        }

        record_activity(
            &txn,
            user_id,
            "boss_attack",
            json!({ "boss_id": boss.id, "damage": damage, "defeated": defeated }),
            0,
        )
        .await?;

        txn.commit().await?;

        if defeated {
            log::info!("Boss {} defeated, finishing blow by user {user_id}", boss.id);
        }

        Ok(AttackBossResponse {
            defeated,
            current_hp: fresh.current_hp,
            total_damage_dealt,
        })
    }

    // -----------------------------
    // Winter market
    // -----------------------------

    pub async fn market_items(&self) -> AppResult<Vec<MarketItemResponse>> {
        let items = market_items::Entity::find()
            .filter(market_items::Column::IsActive.eq(true))
            .order_by_asc(market_items::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Purchase an item: conditional decrement of the cost currency and the
    /// inventory insert commit together, so a failed debit never ships the
    /// item and a crashed purchase never charges.
    pub async fn purchase(&self, user_id: i64, item_id: i64) -> AppResult<PurchaseResponse> {
        let txn = self.pool.begin().await?;

        let user = self.fetch_user_tx(&txn, user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        let item = market_items::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|i| i.is_active)
            .ok_or_else(|| AppError::NotFound("Market item not found".to_string()))?;

        let column = currency_column(item.cost_currency);
        let result = users::Entity::update_many()
            .col_expr(column, Expr::col(column).sub(item.cost_amount))
            .filter(users::Column::Id.eq(user_id))
            .filter(column.gte(item.cost_amount))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ValidationError("Insufficient funds".to_string()));
        }

        inventory_items::ActiveModel {
            user_id: Set(user_id),
            item_id: Set(item.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        record_activity(
            &txn,
            user_id,
            "market_purchase",
            json!({ "item_id": item.id, "cost": item.cost_amount, "currency": item.cost_currency }),
            0,
        )
        .await?;

        let fresh = self.fetch_user_tx(&txn, user_id).await?;
        txn.commit().await?;

        let balance_remaining = match item.cost_currency {
            EventCurrency::Snowflakes => fresh.snowflakes,
            EventCurrency::IceCoins => fresh.ice_coins,
            EventCurrency::WinterTokens => fresh.winter_tokens,
        };

        Ok(PurchaseResponse {
            item: item.into(),
            balance_remaining,
        })
    }

    pub async fn inventory(&self, user_id: i64) -> AppResult<Vec<InventoryItemResponse>> {
        let owned = inventory_items::Entity::find()
            .filter(inventory_items::Column::UserId.eq(user_id))
            .order_by_desc(inventory_items::Column::AcquiredAt)
            .all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(owned.len());
        for entry in owned {
            let name = market_items::Entity::find_by_id(entry.item_id)
                .one(&self.pool)
                .await?
                .map(|i| i.name)
                .unwrap_or_else(|| "Unknown item".to_string());
            result.push(InventoryItemResponse {
                id: entry.id,
                item_id: entry.item_id,
                name,
                acquired_at: entry.acquired_at.unwrap_or_else(Utc::now),
            });
        }
        Ok(result)
    }

    // -----------------------------
    // Internal helpers
    // -----------------------------

    /// Claim a cooldown column atomically: the update only lands when the
    /// window has elapsed, so concurrent claims cannot both pass.
    async fn take_cooldown(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
        column: users::Column,
        window_hours: i64,
        error: &str,
    ) -> AppResult<()> {
        let now = Utc::now();
        let window_start = now - Duration::hours(window_hours);

        let result = users::Entity::update_many()
            .col_expr(column, Expr::value(now))
            .filter(users::Column::Id.eq(user_id))
            .filter(
                Condition::any()
                    .add(column.is_null())
                    .add(column.lte(window_start)),
            )
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ValidationError(error.to_string()));
        }
        Ok(())
    }

    async fn grant_event_currency<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        currency: EventCurrency,
        amount: i64,
    ) -> AppResult<()> {
        let column = currency_column(currency);
        let result = users::Entity::update_many()
            .col_expr(column, Expr::col(column).add(amount))
            .filter(users::Column::Id.eq(user_id))
            .exec(conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Atomic per-user damage tally: optimistic increment, insert on first
    /// attack.
    async fn record_damage(
        &self,
        txn: &DatabaseTransaction,
        boss_id: i64,
        user_id: i64,
        damage: i64,
    ) -> AppResult<i64> {
        let result = boss_damages::Entity::update_many()
            .col_expr(
                boss_damages::Column::TotalDamage,
                Expr::col(boss_damages::Column::TotalDamage).add(damage),
            )
            .col_expr(boss_damages::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(boss_damages::Column::BossId.eq(boss_id))
            .filter(boss_damages::Column::UserId.eq(user_id))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            boss_damages::ActiveModel {
                boss_id: Set(boss_id),
                user_id: Set(user_id),
                total_damage: Set(damage),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            return Ok(damage);
        }

        let tally = boss_damages::Entity::find()
            .filter(boss_damages::Column::BossId.eq(boss_id))
            .filter(boss_damages::Column::UserId.eq(user_id))
            .one(txn)
            .await?
            .map(|d| d.total_damage)
            .unwrap_or(damage);
        Ok(tally)
    }

    async fn reward_boss_contributors(
        &self,
        txn: &DatabaseTransaction,
        boss_id: i64,
        boss_name: &str,
    ) -> AppResult<()> {
        let contributors = boss_damages::Entity::find()
            .filter(boss_damages::Column::BossId.eq(boss_id))
            .all(txn)
            .await?;

        for contributor in &contributors {
            self.grant_event_currency(
                txn,
                contributor.user_id,
                EventCurrency::WinterTokens,
                BOSS_DEFEAT_REWARD_TOKENS,
            )
            .await?;

            insert_notification(
                txn,
                contributor.user_id,
                "Boss defeated!".to_string(),
                format!(
                    "{boss_name} has fallen. You dealt {} damage and earned {BOSS_DEFEAT_REWARD_TOKENS} winter tokens.",
                    contributor.total_damage
                ),
                NotificationType::Success,
            )
            .await?;
        }

        log::info!(
            "Boss {boss_id} defeated, rewarded {} contributors",
            contributors.len()
        );
        Ok(())
    }

    async fn fetch_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn fetch_user_tx(
        &self,
        txn: &DatabaseTransaction,
        user_id: i64,
    ) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn currency_column(currency: EventCurrency) -> users::Column {
    match currency {
        EventCurrency::Snowflakes => users::Column::Snowflakes,
        EventCurrency::IceCoins => users::Column::IceCoins,
        EventCurrency::WinterTokens => users::Column::WinterTokens,
    }
}

/// Map a uniform draw in `[0, 1)` to a mystery box tier.
/// Top 1%: 10 winter tokens; next 19%: 100 ice coins; next 30%: 200
/// snowflakes; the remaining half: 50 snowflakes.
pub fn mystery_reward(draw: f64) -> (EventCurrency, i64) {
    if draw > 0.99 {
        (EventCurrency::WinterTokens, 10)
    } else if draw > 0.8 {
        (EventCurrency::IceCoins, 100)
    } else if draw > 0.5 {
        (EventCurrency::Snowflakes, 200)
    } else {
        (EventCurrency::Snowflakes, 50)
    }
}

/// 10 snowflakes per pip, doubled on a lucky roll.
pub fn dice_reward(roll: i64, is_double: bool) -> i64 {
    let base = roll * 10;
    if is_double { base * 2 } else { base }
}

/// Milestone grants for the heat-up combo.
pub fn streak_milestone(day: i64) -> Option<(EventCurrency, i64)> {
    match day {
        1 => Some((EventCurrency::IceCoins, 50)),
        3 => Some((EventCurrency::IceCoins, 100)),
        7 => Some((EventCurrency::WinterTokens, 5)),
        _ => None,
    }
}

fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mystery_reward_tiers() {
        assert_eq!(mystery_reward(0.995), (EventCurrency::WinterTokens, 10));
        assert_eq!(mystery_reward(0.9), (EventCurrency::IceCoins, 100));
        assert_eq!(mystery_reward(0.6), (EventCurrency::Snowflakes, 200));
        assert_eq!(mystery_reward(0.3), (EventCurrency::Snowflakes, 50));
    }

    #[test]
    fn test_mystery_reward_boundaries() {
        // Boundaries are exclusive upward, matching the original thresholds
        assert_eq!(mystery_reward(0.99), (EventCurrency::IceCoins, 100));
        assert_eq!(mystery_reward(0.8), (EventCurrency::Snowflakes, 200));
        assert_eq!(mystery_reward(0.5), (EventCurrency::Snowflakes, 50));
        assert_eq!(mystery_reward(0.0), (EventCurrency::Snowflakes, 50));
    }

    #[test]
    fn test_dice_reward() {
        assert_eq!(dice_reward(1, false), 10);
        assert_eq!(dice_reward(6, false), 60);
        assert_eq!(dice_reward(4, true), 80);
    }

    #[test]
    fn test_streak_milestones() {
        assert_eq!(streak_milestone(1), Some((EventCurrency::IceCoins, 50)));
        assert_eq!(streak_milestone(2), None);
        assert_eq!(streak_milestone(3), Some((EventCurrency::IceCoins, 100)));
        assert_eq!(streak_milestone(7), Some((EventCurrency::WinterTokens, 5)));
        assert_eq!(streak_milestone(8), None);
    }

    #[test]
    fn test_start_of_utc_day() {
        let now = Utc::now();
        let start = start_of_utc_day(now);
        assert!(start <= now);
        assert_eq!(start.time(), chrono::NaiveTime::MIN);
    }
}
