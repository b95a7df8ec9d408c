use anyhow::Context;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};

use dividend_indexer::application::{DividendBlock, DividendIndexer};
use dividend_indexer::config::AppConfig;
use dividend_indexer::domain::models::DividendTx;
use dividend_indexer::domain::services::compose::message_payload;
use dividend_indexer::domain::services::ComposeRequest;
use dividend_indexer::infrastructure::persistence::DbPool;
use dividend_indexer::utils::logging;

/// Dividend message handler for the token ledger
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        /// Number of migrations to run (all if not specified)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Apply one dividend message as the only message of its block
    Parse {
        #[arg(long)]
        block_index: u64,
        #[arg(long)]
        tx_index: u64,
        #[arg(long)]
        tx_hash: String,
        #[arg(long)]
        source: String,
        /// Message payload in hex
        #[arg(long)]
        data: String,
        /// Payload still carries the message type id, as printed by `compose`
        #[arg(long, default_value_t = false)]
        prefixed: bool,
    },
    /// Pay out scheduled dividends due at a height
    Activate {
        #[arg(long)]
        height: u64,
    },
    /// Validate a dividend and print the transaction contents as JSON
    Compose {
        #[arg(long)]
        source: String,
        #[arg(long)]
        quantity_per_unit: u64,
        #[arg(long)]
        asset: String,
        #[arg(long)]
        dividend_asset: String,
        /// Blocks from now until payout, for a scheduled dividend
        #[arg(long, allow_negative_numbers = true)]
        activation: Option<i64>,
        /// Height to validate against
        #[arg(long)]
        block_index: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    logging::log_info(&format!(
        "Dividend indexer {} on {}",
        env!("CARGO_PKG_VERSION"),
        config.network.network.name()
    ));

    match cli.command {
        Commands::Migrate { steps } => {
            let pool = DbPool::new(&config).await?;
            Migrator::up(pool.get_connection(), steps).await?;
            logging::log_info("Migrations applied");
        }
        Commands::Parse {
            block_index,
            tx_index,
            tx_hash,
            source,
            data,
            prefixed,
        } => {
            let bytes = hex::decode(data.trim()).context("payload is not valid hex")?;
            let payload = if prefixed {
                message_payload(&bytes)
                    .context("payload does not start with the dividend message id")?
                    .to_vec()
            } else {
                bytes
            };

            let indexer = DividendIndexer::connect(&config).await?;
            let tx = DividendTx {
                tx_index,
                tx_hash,
                block_index,
                source,
            };
            let summary = indexer
                .process_block(&DividendBlock::new(block_index).with_message(tx, payload))
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Activate { height } => {
            let indexer = DividendIndexer::connect(&config).await?;
            let summary = indexer.activate(height).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Compose {
            source,
            quantity_per_unit,
            asset,
            dividend_asset,
            activation,
            block_index,
        } => {
            let indexer = DividendIndexer::connect(&config).await?;
            let composed = indexer
                .compose(&ComposeRequest {
                    source,
                    quantity_per_unit,
                    asset,
                    dividend_asset,
                    activation,
                    block_index,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&composed)?);
        }
    }

    Ok(())
}
