use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    PasswordHash,
    Role,
    Credits,
    PlanType,
    SubscriptionEndDate,
    ImageTokens,
    CodeTokens,
    IsBlocked,
    RewardStreak,
    TotalRewardsClaimed,
    LastRewardClaim,
    LastSpinTime,
    LastDiceRoll,
    LastLogin,
    LoginCount,
    Snowflakes,
    IceCoins,
    WinterTokens,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CreditLogs {
    Table,
    Id,
    UserId,
    Amount,
    Reason,
    ActorId,
    ActionType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentRequests {
    Table,
    Id,
    UserId,
    UserEmail,
    Amount,
    PlanType,
    Status,
    DecidedBy,
    DecidedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    NotificationType,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    UserId,
    DiscountPercent,
    IsUsed,
    UsedAt,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DailyRewards {
    Table,
    Id,
    UserId,
    RewardType,
    RewardValue,
    CouponCode,
    StreakDay,
    ClaimedAt,
}

#[derive(DeriveIden)]
enum Streaks {
    Table,
    Id,
    UserId,
    CurrentStreak,
    LastClaimDate,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BossFights {
    Table,
    Id,
    Name,
    MaxHp,
    CurrentHp,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BossDamages {
    Table,
    Id,
    BossId,
    UserId,
    TotalDamage,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MarketItems {
    Table,
    Id,
    Name,
    Description,
    CostCurrency,
    CostAmount,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    UserId,
    ItemId,
    AcquiredAt,
}

#[derive(DeriveIden)]
enum ChatHistories {
    Table,
    Id,
    UserId,
    Messages,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    ActionType,
    Details,
    CreditsUsed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SessionRevocations {
    Table,
    Id,
    UserId,
    RevokedBy,
    RevokedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Amount,
    Currency,
    PlanType,
    Status,
    PaymentMethod,
    Reference,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk_big(col: impl IntoIden) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.big_integer().not_null().auto_increment().primary_key();
    def
}

fn timestamp_now(col: impl IntoIden) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.timestamp_with_time_zone()
        .not_null()
        .default(Expr::cust("NOW()"));
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 账户表 - balances are authoritative here, the ledger is advisory
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut pk_big(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::Credits).big_integer().not_null().default(100))
                    .col(ColumnDef::new(Users::PlanType).string().not_null().default("free"))
                    .col(ColumnDef::new(Users::SubscriptionEndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::ImageTokens).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::CodeTokens).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::IsBlocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::RewardStreak).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Users::TotalRewardsClaimed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::LastRewardClaim).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::LastSpinTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::LastDiceRoll).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::LoginCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Snowflakes).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::IceCoins).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::WinterTokens).big_integer().not_null().default(0))
                    .col(&mut timestamp_now(Users::CreatedAt))
                    .col(&mut timestamp_now(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 积分流水 (append-only)
        manager
            .create_table(
                Table::create()
                    .table(CreditLogs::Table)
                    .if_not_exists()
                    .col(&mut pk_big(CreditLogs::Id))
                    .col(ColumnDef::new(CreditLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CreditLogs::Amount).big_integer().not_null())
                    .col(ColumnDef::new(CreditLogs::Reason).string().not_null())
                    .col(ColumnDef::new(CreditLogs::ActorId).big_integer())
                    .col(ColumnDef::new(CreditLogs::ActionType).string().not_null())
                    .col(&mut timestamp_now(CreditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_logs_user_id")
                    .table(CreditLogs::Table)
                    .col(CreditLogs::UserId)
                    .to_owned(),
            )
            .await?;

        // 充值/升级申请 (admin approval flow)
        manager
            .create_table(
                Table::create()
                    .table(PaymentRequests::Table)
                    .if_not_exists()
                    .col(&mut pk_big(PaymentRequests::Id))
                    .col(ColumnDef::new(PaymentRequests::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PaymentRequests::UserEmail).string().not_null())
                    .col(ColumnDef::new(PaymentRequests::Amount).big_integer().not_null())
                    .col(ColumnDef::new(PaymentRequests::PlanType).string())
                    .col(
                        ColumnDef::new(PaymentRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(PaymentRequests::DecidedBy).big_integer())
                    .col(ColumnDef::new(PaymentRequests::DecidedAt).timestamp_with_time_zone())
                    .col(&mut timestamp_now(PaymentRequests::CreatedAt))
                    .col(&mut timestamp_now(PaymentRequests::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_requests_status")
                    .table(PaymentRequests::Table)
                    .col(PaymentRequests::Status)
                    .to_owned(),
            )
            .await?;

        // 用户通知
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(&mut pk_big(Notifications::Id))
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::NotificationType).string().not_null())
                    .col(ColumnDef::new(Notifications::IsRead).boolean().not_null().default(false))
                    .col(&mut timestamp_now(Notifications::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id_is_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        // 优惠券 (single-use, expiring)
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(&mut pk_big(Coupons::Id))
                    .col(ColumnDef::new(Coupons::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Coupons::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Coupons::DiscountPercent).integer().not_null())
                    .col(ColumnDef::new(Coupons::IsUsed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Coupons::UsedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Coupons::ExpiresAt).timestamp_with_time_zone().not_null())
                    .col(&mut timestamp_now(Coupons::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // 每日奖励记录
        manager
            .create_table(
                Table::create()
                    .table(DailyRewards::Table)
                    .if_not_exists()
                    .col(&mut pk_big(DailyRewards::Id))
                    .col(ColumnDef::new(DailyRewards::UserId).big_integer().not_null())
                    .col(ColumnDef::new(DailyRewards::RewardType).string().not_null())
                    .col(ColumnDef::new(DailyRewards::RewardValue).big_integer().not_null())
                    .col(ColumnDef::new(DailyRewards::CouponCode).string())
                    .col(ColumnDef::new(DailyRewards::StreakDay).big_integer().not_null())
                    .col(&mut timestamp_now(DailyRewards::ClaimedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_daily_rewards_user_id")
                    .table(DailyRewards::Table)
                    .col(DailyRewards::UserId)
                    .to_owned(),
            )
            .await?;

        // 连击 (heat-up combo)
        manager
            .create_table(
                Table::create()
                    .table(Streaks::Table)
                    .if_not_exists()
                    .col(&mut pk_big(Streaks::Id))
                    .col(ColumnDef::new(Streaks::UserId).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(Streaks::CurrentStreak).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Streaks::LastClaimDate).timestamp_with_time_zone())
                    .col(&mut timestamp_now(Streaks::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Boss 战
        manager
            .create_table(
                Table::create()
                    .table(BossFights::Table)
                    .if_not_exists()
                    .col(&mut pk_big(BossFights::Id))
                    .col(ColumnDef::new(BossFights::Name).string().not_null())
                    .col(ColumnDef::new(BossFights::MaxHp).big_integer().not_null())
                    .col(ColumnDef::new(BossFights::CurrentHp).big_integer().not_null())
                    .col(ColumnDef::new(BossFights::Status).string().not_null().default("active"))
                    .col(&mut timestamp_now(BossFights::CreatedAt))
                    .col(&mut timestamp_now(BossFights::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BossDamages::Table)
                    .if_not_exists()
                    .col(&mut pk_big(BossDamages::Id))
                    .col(ColumnDef::new(BossDamages::BossId).big_integer().not_null())
                    .col(ColumnDef::new(BossDamages::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BossDamages::TotalDamage).big_integer().not_null().default(0))
                    .col(&mut timestamp_now(BossDamages::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_boss_damages_boss_user")
                    .table(BossDamages::Table)
                    .col(BossDamages::BossId)
                    .col(BossDamages::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 冬季集市商品与库存
        manager
            .create_table(
                Table::create()
                    .table(MarketItems::Table)
                    .if_not_exists()
                    .col(&mut pk_big(MarketItems::Id))
                    .col(ColumnDef::new(MarketItems::Name).string().not_null())
                    .col(ColumnDef::new(MarketItems::Description).text())
                    .col(ColumnDef::new(MarketItems::CostCurrency).string().not_null())
                    .col(ColumnDef::new(MarketItems::CostAmount).big_integer().not_null())
                    .col(ColumnDef::new(MarketItems::IsActive).boolean().not_null().default(true))
                    .col(&mut timestamp_now(MarketItems::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(&mut pk_big(InventoryItems::Id))
                    .col(ColumnDef::new(InventoryItems::UserId).big_integer().not_null())
                    .col(ColumnDef::new(InventoryItems::ItemId).big_integer().not_null())
                    .col(&mut timestamp_now(InventoryItems::AcquiredAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_user_id")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::UserId)
                    .to_owned(),
            )
            .await?;

        // 聊天记录
        manager
            .create_table(
                Table::create()
                    .table(ChatHistories::Table)
                    .if_not_exists()
                    .col(&mut pk_big(ChatHistories::Id))
                    .col(ColumnDef::new(ChatHistories::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ChatHistories::Messages).json_binary().not_null())
                    .col(&mut timestamp_now(ChatHistories::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_histories_user_id")
                    .table(ChatHistories::Table)
                    .col(ChatHistories::UserId)
                    .to_owned(),
            )
            .await?;

        // 行为日志 (append-only)
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(&mut pk_big(ActivityLogs::Id))
                    .col(ColumnDef::new(ActivityLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ActivityLogs::ActionType).string().not_null())
                    .col(
                        ColumnDef::new(ActivityLogs::Details)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(ColumnDef::new(ActivityLogs::CreditsUsed).big_integer().not_null().default(0))
                    .col(&mut timestamp_now(ActivityLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .to_owned(),
            )
            .await?;

        // 强制登出哨兵
        manager
            .create_table(
                Table::create()
                    .table(SessionRevocations::Table)
                    .if_not_exists()
                    .col(&mut pk_big(SessionRevocations::Id))
                    .col(ColumnDef::new(SessionRevocations::UserId).big_integer().not_null())
                    .col(ColumnDef::new(SessionRevocations::RevokedBy).big_integer().not_null())
                    .col(&mut timestamp_now(SessionRevocations::RevokedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_session_revocations_user_id")
                    .table(SessionRevocations::Table)
                    .col(SessionRevocations::UserId)
                    .to_owned(),
            )
            .await?;

        // 营收流水 (analytics)
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(&mut pk_big(Transactions::Id))
                    .col(ColumnDef::new(Transactions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::Currency).string().not_null().default("INR"))
                    .col(ColumnDef::new(Transactions::PlanType).string().not_null())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(ColumnDef::new(Transactions::PaymentMethod).string())
                    .col(ColumnDef::new(Transactions::Reference).string())
                    .col(&mut timestamp_now(Transactions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "transactions",
            "session_revocations",
            "activity_logs",
            "chat_histories",
            "inventory_items",
            "market_items",
            "boss_damages",
            "boss_fights",
            "streaks",
            "daily_rewards",
            "coupons",
            "notifications",
            "payment_requests",
            "credit_logs",
            "users",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
                .await?;
        }
        Ok(())
    }
}
