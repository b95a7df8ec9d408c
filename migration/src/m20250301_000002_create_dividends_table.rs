use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Undecodable messages are stored with null asset and quantity columns
        manager
            .create_table(
                Table::create()
                    .table(Dividends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dividends::TxIndex).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Dividends::TxHash).text().not_null().unique_key())
                    .col(ColumnDef::new(Dividends::BlockIndex).big_integer().not_null())
                    .col(ColumnDef::new(Dividends::Source).text().not_null())
                    .col(ColumnDef::new(Dividends::Asset).text().null())
                    .col(ColumnDef::new(Dividends::DividendAsset).text().null())
                    .col(ColumnDef::new(Dividends::QuantityPerUnit).big_integer().null())
                    .col(ColumnDef::new(Dividends::FeePaid).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Dividends::Status).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dividends_block_index")
                    .table(Dividends::Table)
                    .col(Dividends::BlockIndex)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dividends_source")
                    .table(Dividends::Table)
                    .col(Dividends::Source)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dividends_asset")
                    .table(Dividends::Table)
                    .col(Dividends::Asset)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dividends::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Dividends {
    Table,
    TxIndex,
    TxHash,
    BlockIndex,
    Source,
    Asset,
    DividendAsset,
    QuantityPerUnit,
    FeePaid,
    Status,
}
