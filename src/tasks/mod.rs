//! Background jobs: ledger reconciliation and retention sweeps.
//!
//! The reconciliation loop is the formal replacement for the old
//! poll-beside-push pattern: instead of every client polling on a fixed
//! 5-second timer, the server audits ledger-vs-balance drift itself on a
//! jittered interval with exponential backoff on failure. Call `spawn_all`
//! once during startup; tasks detach via `tokio::spawn`.

use crate::database::DbPool;
use crate::entities::{coupon_entity as coupons, session_revocation_entity as session_revocations};
use crate::services::SubscriptionService;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::time::Duration;

/// Base interval between reconciliation passes.
const RECONCILE_BASE_SECS: u64 = 300;
/// Backoff ceiling when the store keeps failing.
const RECONCILE_MAX_BACKOFF_SECS: u64 = 3600;
/// Jitter added to every sleep so replicas do not audit in lockstep.
const RECONCILE_JITTER_SECS: u64 = 30;

/// Rows older than this are swept: revocation sentinels past the refresh
/// token lifetime, and coupons long past their expiry.
const RETENTION_DAYS: i64 = 30;
const RETENTION_SWEEP_SECS: u64 = 24 * 3600;

pub fn spawn_all(pool: DbPool, subscription_service: SubscriptionService) {
    // 账本对账 (advisory, logs drift only)
    {
        let svc = subscription_service.clone();
        tokio::spawn(async move {
            let mut backoff: u64 = RECONCILE_BASE_SECS;
            loop {
                match svc.ledger_drift().await {
                    Ok(drifted) => {
                        if drifted.is_empty() {
                            log::debug!("Ledger reconciliation: no drift");
                        } else {
                            for (user_id, balance, expected) in &drifted {
                                log::warn!(
                                    "Ledger drift for user {user_id}: balance {balance}, ledger replay {expected}"
                                );
                            }
                        }
                        backoff = RECONCILE_BASE_SECS;
                    }
                    Err(e) => {
                        log::error!("Ledger reconciliation failed: {e:?}");
                        backoff = (backoff * 2).min(RECONCILE_MAX_BACKOFF_SECS);
                    }
                }

                let jitter = { rand::thread_rng().gen_range(0..RECONCILE_JITTER_SECS) };
                tokio::time::sleep(Duration::from_secs(backoff + jitter)).await;
            }
        });
    }

    // 过期数据清理（每天一次）
    {
        let pool = pool.clone();
        tokio::spawn(async move {
            loop {
                let cutoff = Utc::now() - ChronoDuration::days(RETENTION_DAYS);

                match session_revocations::Entity::delete_many()
                    .filter(session_revocations::Column::RevokedAt.lt(cutoff))
                    .exec(&pool)
                    .await
                {
                    Ok(res) if res.rows_affected > 0 => {
                        log::info!("Pruned {} stale session revocations", res.rows_affected);
                    }
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to prune session revocations: {e:?}"),
                }

                match coupons::Entity::delete_many()
                    .filter(coupons::Column::ExpiresAt.lt(cutoff))
                    .exec(&pool)
                    .await
                {
                    Ok(res) if res.rows_affected > 0 => {
                        log::info!("Pruned {} long-expired coupons", res.rows_affected);
                    }
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to prune expired coupons: {e:?}"),
                }

                tokio::time::sleep(Duration::from_secs(RETENTION_SWEEP_SECS)).await;
            }
        });
    }
}
