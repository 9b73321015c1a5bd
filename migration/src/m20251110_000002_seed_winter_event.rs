use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum MarketItems {
    Table,
    Name,
    Description,
    CostCurrency,
    CostAmount,
    IsActive,
}

#[derive(DeriveIden)]
enum BossFights {
    Table,
    Name,
    MaxHp,
    CurrentHp,
    Status,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seed data for the Crazy Winter event: the market catalogue and the first
/// active boss. Costs are denominated in the event currencies
/// (snowflakes / ice_coins / winter_tokens).
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let items: [(&str, &str, &str, i64); 5] = [
            ("Frost Avatar Frame", "Profile frame for the winter season", "snowflakes", 300),
            ("Icy Chat Theme", "Chat skin with falling snow", "snowflakes", 500),
            ("Glacier Badge", "Profile badge", "ice_coins", 150),
            ("Aurora Banner", "Animated profile banner", "ice_coins", 400),
            ("Yeti Companion", "Rare companion for the session view", "winter_tokens", 8),
        ];

        for (name, description, currency, cost) in items {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(MarketItems::Table)
                        .columns([
                            MarketItems::Name,
                            MarketItems::Description,
                            MarketItems::CostCurrency,
                            MarketItems::CostAmount,
                            MarketItems::IsActive,
                        ])
                        .values_panic([
                            name.into(),
                            description.into(),
                            currency.into(),
                            cost.into(),
                            true.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(BossFights::Table)
                    .columns([
                        BossFights::Name,
                        BossFights::MaxHp,
                        BossFights::CurrentHp,
                        BossFights::Status,
                    ])
                    .values_panic(["Blizzard Colossus".into(), 100_000i64.into(), 100_000i64.into(), "active".into()])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM boss_fights WHERE name = 'Blizzard Colossus'")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM market_items")
            .await?;
        Ok(())
    }
}
