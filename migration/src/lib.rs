pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_ledger_tables;
mod m20250301_000002_create_dividends_table;
mod m20250312_000001_add_activation_to_dividends;
mod m20250312_000002_create_dividend_activations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_ledger_tables::Migration),
            Box::new(m20250301_000002_create_dividends_table::Migration),
            Box::new(m20250312_000001_add_activation_to_dividends::Migration),
            Box::new(m20250312_000002_create_dividend_activations_table::Migration),
        ]
    }
}
