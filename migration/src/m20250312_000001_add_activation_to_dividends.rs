use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Scheduled dividends: block delta as sent, plus the absolute height it resolves to
        if !manager.has_column("dividends", "activation").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Dividends::Table)
                        .add_column(ColumnDef::new(Dividends::Activation).big_integer().null())
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("dividends", "activate_index").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Dividends::Table)
                        .add_column(ColumnDef::new(Dividends::ActivateIndex).big_integer().null())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_dividends_activate_status")
                    .table(Dividends::Table)
                    .col(Dividends::ActivateIndex)
                    .col(Dividends::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_dividends_activate_status")
                    .table(Dividends::Table)
                    .to_owned(),
            )
            .await?;

        if manager.has_column("dividends", "activate_index").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Dividends::Table)
                        .drop_column(Dividends::ActivateIndex)
                        .to_owned(),
                )
                .await?;
        }

        if manager.has_column("dividends", "activation").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Dividends::Table)
                        .drop_column(Dividends::Activation)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Dividends {
    Table,
    Activation,
    ActivateIndex,
    Status,
}
