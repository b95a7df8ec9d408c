use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DividendActivations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DividendActivations::DividendIndex)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DividendActivations::DividendHash)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DividendActivations::Source).text().not_null())
                    .col(ColumnDef::new(DividendActivations::BlockIndex).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dividend_activations_dividend")
                            .from(DividendActivations::Table, DividendActivations::DividendIndex)
                            .to(Dividends::Table, Dividends::TxIndex),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dividend_activations_block_index")
                    .table(DividendActivations::Table)
                    .col(DividendActivations::BlockIndex)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dividend_activations_source")
                    .table(DividendActivations::Table)
                    .col(DividendActivations::Source)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DividendActivations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DividendActivations {
    Table,
    DividendIndex,
    DividendHash,
    Source,
    BlockIndex,
}

#[derive(DeriveIden)]
enum Dividends {
    Table,
    TxIndex,
}
