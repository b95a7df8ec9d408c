use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Asset registry; ids are stored as decimal text to keep the full u64 range
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assets::AssetId).text().not_null().primary_key())
                    .col(ColumnDef::new(Assets::AssetName).text().not_null().unique_key())
                    .col(ColumnDef::new(Assets::AssetLongname).text().null().unique_key())
                    .col(ColumnDef::new(Assets::BlockIndex).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Issuances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issuances::TxIndex).big_integer().not_null().primary_key())
                    .col(ColumnDef::new(Issuances::TxHash).text().not_null().unique_key())
                    .col(ColumnDef::new(Issuances::BlockIndex).big_integer().not_null())
                    .col(ColumnDef::new(Issuances::Asset).text().not_null())
                    .col(ColumnDef::new(Issuances::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Issuances::Divisible).boolean().not_null())
                    .col(ColumnDef::new(Issuances::Issuer).text().not_null())
                    .col(ColumnDef::new(Issuances::Locked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Issuances::Status).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issuances_asset_status")
                    .table(Issuances::Table)
                    .col(Issuances::Asset)
                    .col(Issuances::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Balances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Balances::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Balances::Address).text().not_null())
                    .col(ColumnDef::new(Balances::Asset).text().not_null())
                    .col(ColumnDef::new(Balances::Quantity).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balances_address_asset")
                    .table(Balances::Table)
                    .col(Balances::Address)
                    .col(Balances::Asset)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Escrowed balances (open orders, bets) count as holders too
        manager
            .create_table(
                Table::create()
                    .table(Escrows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Escrows::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Escrows::Address).text().not_null())
                    .col(ColumnDef::new(Escrows::Asset).text().not_null())
                    .col(ColumnDef::new(Escrows::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Escrows::Escrow).text().not_null())
                    .to_owned(),
            )
            .await?;

        for table in [Movements::Credits, Movements::Debits] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(Movements::Id).big_integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Movements::Address).text().not_null())
                        .col(ColumnDef::new(Movements::Asset).text().not_null())
                        .col(ColumnDef::new(Movements::Quantity).big_integer().not_null())
                        .col(ColumnDef::new(Movements::Action).text().not_null())
                        .col(ColumnDef::new(Movements::Event).text().not_null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [Movements::Debits, Movements::Credits] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Escrows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Balances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issuances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    AssetId,
    AssetName,
    AssetLongname,
    BlockIndex,
}

#[derive(DeriveIden)]
enum Issuances {
    Table,
    TxIndex,
    TxHash,
    BlockIndex,
    Asset,
    Quantity,
    Divisible,
    Issuer,
    Locked,
    Status,
}

#[derive(DeriveIden)]
enum Balances {
    Table,
    Id,
    Address,
    Asset,
    Quantity,
}

#[derive(DeriveIden)]
enum Escrows {
    Table,
    Id,
    Address,
    Asset,
    Quantity,
    Escrow,
}

#[derive(DeriveIden, Clone, Copy)]
enum Movements {
    Credits,
    Debits,
    Id,
    Address,
    Asset,
    Quantity,
    Action,
    Event,
}
