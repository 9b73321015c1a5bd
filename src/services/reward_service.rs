use crate::entities::{
    coupon_entity as coupons, credit_log_entity as credit_logs,
    daily_reward_entity as daily_rewards, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CouponResponse, DailyRewardResponse, NotificationType, RedeemCouponResponse,
    RewardStatusResponse, RewardType,
};
use crate::realtime::{EventHub, RealtimeEvent};
use crate::services::audit::record_activity;
use crate::services::notification_service::insert_notification;
use crate::utils::generate_coupon_code;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;

/// Daily reward cooldown.
const DAILY_REWARD_WINDOW_HOURS: i64 = 24;
/// A claim within this window continues the streak; later claims reset it.
const STREAK_CONTINUATION_HOURS: i64 = 48;
/// Coupons granted by the daily reward stay valid this long.
const COUPON_VALIDITY_DAYS: i64 = 30;

#[derive(Clone)]
pub struct RewardService {
    pool: DatabaseConnection,
    hub: EventHub,
}

impl RewardService {
    pub fn new(pool: DatabaseConnection, hub: EventHub) -> Self {
        Self { pool, hub }
    }

    pub async fn status(&self, user_id: i64) -> AppResult<RewardStatusResponse> {
        let user = self.fetch_user(user_id).await?;
        let now = Utc::now();

        let can_claim = cooldown_elapsed(user.last_reward_claim, now, DAILY_REWARD_WINDOW_HOURS);
        let next_claim_time = user
            .last_reward_claim
            .map(|last| last + Duration::hours(DAILY_REWARD_WINDOW_HOURS))
            .filter(|_| !can_claim);

        Ok(RewardStatusResponse {
            can_claim,
            next_claim_time,
            reward_streak: user.reward_streak,
            total_rewards_claimed: user.total_rewards_claimed,
        })
    }

    /// Claim the daily reward: 70% a credit grant that scales with the
    /// streak, 30% a discount coupon.
    ///
    /// The cooldown stamp is taken with a conditional update (claim only
    /// where the window has elapsed), so two racing claims cannot both pass
    /// the eligibility check, and the stamp, grant, ledger entry and reward
    /// record all commit in one transaction.
    pub async fn claim_daily(&self, user_id: i64) -> AppResult<DailyRewardResponse> {
        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let user = self.fetch_user_tx(&txn, user_id).await?;
        if user.is_blocked {
            return Err(AppError::Forbidden);
        }

        let streak = next_streak(user.last_reward_claim, user.reward_streak, now);

        let window_start = now - Duration::hours(DAILY_REWARD_WINDOW_HOURS);
        let result = users::Entity::update_many()
            .col_expr(users::Column::LastRewardClaim, Expr::value(now))
            .col_expr(users::Column::RewardStreak, Expr::value(streak))
            .col_expr(
                users::Column::TotalRewardsClaimed,
                Expr::col(users::Column::TotalRewardsClaimed).add(1),
            )
            .filter(users::Column::Id.eq(user_id))
            .filter(
                Condition::any()
                    .add(users::Column::LastRewardClaim.is_null())
                    .add(users::Column::LastRewardClaim.lte(window_start)),
            )
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::ValidationError(
                "Daily reward not available yet".to_string(),
            ));
        }

        let is_credits = { rand::thread_rng().gen_bool(0.7) };

        let reward = if is_credits {
            let bonus_roll = { rand::thread_rng().gen_range(0..10) };
            let amount = daily_credit_amount(streak, bonus_roll);

            users::Entity::update_many()
                .col_expr(
                    users::Column::Credits,
                    Expr::col(users::Column::Credits).add(amount),
                )
                .filter(users::Column::Id.eq(user_id))
                .exec(&txn)
                .await?;

            credit_logs::ActiveModel {
                user_id: Set(user_id),
                amount: Set(amount),
                reason: Set(format!("Daily reward - Day {streak}")),
                action_type: Set("reward".to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            daily_rewards::ActiveModel {
                user_id: Set(user_id),
                reward_type: Set(RewardType::Credits),
                reward_value: Set(amount),
                streak_day: Set(streak),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        } else {
            let discount = { rand::thread_rng().gen_range(10..31) };
            let code = generate_coupon_code();

            coupons::ActiveModel {
                code: Set(code.clone()),
                user_id: Set(user_id),
                discount_percent: Set(discount),
                is_used: Set(false),
                expires_at: Set(now + Duration::days(COUPON_VALIDITY_DAYS)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            daily_rewards::ActiveModel {
                user_id: Set(user_id),
                reward_type: Set(RewardType::Coupon),
                reward_value: Set(discount as i64),
                coupon_code: Set(Some(code)),
                streak_day: Set(streak),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        };

        let description = match reward.reward_type {
            RewardType::Credits => format!("You earned {} credits (day {streak})", reward.reward_value),
            RewardType::Coupon => format!(
                "You won a {}% discount coupon (day {streak})",
                reward.reward_value
            ),
        };

        insert_notification(
            &txn,
            user_id,
            "Daily reward claimed".to_string(),
            description.clone(),
            NotificationType::Reward,
        )
        .await?;

        record_activity(
            &txn,
            user_id,
            "reward_claim",
            json!({
                "reward_type": reward.reward_type,
                "value": reward.reward_value,
                "streak": streak,
            }),
            0,
        )
        .await?;

        txn.commit().await?;

        self.hub.publish(RealtimeEvent::Reward {
            user_id,
            engine: "daily_reward".to_string(),
            description,
        });
        self.hub.publish(RealtimeEvent::NotificationsChanged { user_id });

        Ok(reward.into())
    }

    /// Reward history, newest first (last 30 claims).
    pub async fn history(&self, user_id: i64) -> AppResult<Vec<DailyRewardResponse>> {
        let items = daily_rewards::Entity::find()
            .filter(daily_rewards::Column::UserId.eq(user_id))
            .order_by_desc(daily_rewards::Column::ClaimedAt)
            .limit(30)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// The user's unused, unexpired coupons.
    pub async fn list_coupons(&self, user_id: i64) -> AppResult<Vec<CouponResponse>> {
        let items = coupons::Entity::find()
            .filter(coupons::Column::UserId.eq(user_id))
            .filter(coupons::Column::IsUsed.eq(false))
            .filter(coupons::Column::ExpiresAt.gt(Utc::now()))
            .order_by_desc(coupons::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Redeem a coupon. The read distinguishes the failure message; the
    /// conditional update is what actually guarantees single use - a racing
    /// redemption of the same code sees zero affected rows.
    pub async fn redeem_coupon(&self, user_id: i64, code: &str) -> AppResult<RedeemCouponResponse> {
        let code = code.trim().to_uppercase();
        let now = Utc::now();

        let coupon = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid coupon code".to_string()))?;

        if coupon.is_used {
            return Err(AppError::ValidationError("Coupon already used".to_string()));
        }
        if coupon.is_expired(now) {
            return Err(AppError::ValidationError("Coupon expired".to_string()));
        }

        let result = coupons::Entity::update_many()
            .col_expr(coupons::Column::IsUsed, Expr::value(true))
            .col_expr(coupons::Column::UsedAt, Expr::value(now))
            .filter(coupons::Column::Id.eq(coupon.id))
            .filter(coupons::Column::IsUsed.eq(false))
            .filter(coupons::Column::ExpiresAt.gt(now))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict("Coupon already used".to_string()));
        }

        record_activity(
            &self.pool,
            user_id,
            "coupon_use",
            json!({ "code": code, "discount": coupon.discount_percent }),
            0,
        )
        .await?;

        Ok(RedeemCouponResponse {
            valid: true,
            discount_percent: coupon.discount_percent,
            message: format!("{}% discount applied!", coupon.discount_percent),
        })
    }

    // -----------------------------
    // Internal helpers
    // -----------------------------

    async fn fetch_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn fetch_user_tx(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        user_id: i64,
    ) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

/// Inclusive cooldown check: exactly at the window edge counts as elapsed,
/// and an account that has never claimed is always eligible.
pub fn cooldown_elapsed(last: Option<DateTime<Utc>>, now: DateTime<Utc>, window_hours: i64) -> bool {
    match last {
        None => true,
        Some(last) => now - last >= Duration::hours(window_hours),
    }
}

/// A claim inside the continuation window extends the streak; outside it the
/// streak restarts at day 1.
pub fn next_streak(last_claim: Option<DateTime<Utc>>, current_streak: i64, now: DateTime<Utc>) -> i64 {
    match last_claim {
        Some(last) if now - last < Duration::hours(STREAK_CONTINUATION_HOURS) => current_streak + 1,
        _ => 1,
    }
}

/// Credit payout: 10 base, +2 per streak day capped at +40, plus a 0-9 roll.
pub fn daily_credit_amount(streak: i64, bonus_roll: i64) -> i64 {
    10 + (streak * 2).min(40) + bonus_roll
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours_ago(h: i64) -> DateTime<Utc> {
        Utc::now() - Duration::hours(h)
    }

    #[test]
    fn test_cooldown_never_claimed() {
        assert!(cooldown_elapsed(None, Utc::now(), 24));
    }

    #[test]
    fn test_cooldown_just_claimed() {
        assert!(!cooldown_elapsed(Some(Utc::now()), Utc::now(), 24));
    }

    #[test]
    fn test_cooldown_boundary_is_inclusive() {
        let now = Utc::now();
        let exactly = now - Duration::hours(24);
        assert!(cooldown_elapsed(Some(exactly), now, 24));

        let just_inside = now - Duration::hours(24) + Duration::seconds(1);
        assert!(!cooldown_elapsed(Some(just_inside), now, 24));
    }

    #[test]
    fn test_streak_continues_within_48_hours() {
        assert_eq!(next_streak(Some(hours_ago(25)), 3, Utc::now()), 4);
    }

    #[test]
    fn test_streak_resets_after_48_hours() {
        assert_eq!(next_streak(Some(hours_ago(49)), 7, Utc::now()), 1);
    }

    #[test]
    fn test_streak_starts_at_one_for_new_account() {
        assert_eq!(next_streak(None, 0, Utc::now()), 1);
    }

    #[test]
    fn test_streak_boundary_resets() {
        let now = Utc::now();
        assert_eq!(next_streak(Some(now - Duration::hours(48)), 5, now), 1);
    }

    #[test]
    fn test_daily_credit_amount_bounds() {
        // Day 1, worst roll
        assert_eq!(daily_credit_amount(1, 0), 12);
        // Deep streak hits the +40 cap
        assert_eq!(daily_credit_amount(100, 0), 50);
        // Best roll on a capped streak
        assert_eq!(daily_credit_amount(20, 9), 59);
    }
}
