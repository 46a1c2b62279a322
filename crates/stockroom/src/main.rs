// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stockroom - stock availability and orders for a small business.
//!
//! This is the binary entry point. Every command reads from the tabular
//! store configured under `[store]`.

mod catalog;
mod dashboard;
mod doctor;
mod inventory;
mod orders;
mod output;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use stockroom_config::model::StockroomConfig;
use stockroom_core::{CustomerId, OrderId, OrderStatus, ProductId, StockroomError};
use stockroom_inventory::StockThresholds;
use stockroom_postgrest::RestClient;

use crate::output::Output;

/// Stockroom - stock availability and orders for a small business.
#[derive(Parser, Debug)]
#[command(name = "stockroom", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Stock, reserved and available quantity of every product.
    Inventory,
    /// Products that are out of stock or running low.
    Alerts,
    /// Headline stock and order figures.
    Dashboard,
    /// Open reservations of one product.
    Reservations {
        /// Product identifier.
        product_id: String,
    },
    /// Products offered to one customer, with availability.
    Catalog {
        /// Customer identifier.
        customer_id: String,
    },
    /// Move an order to a later status (Entregue, Faturado).
    SetStatus {
        /// Order identifier.
        order_id: String,
        /// New status.
        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },
    /// Check configuration and store connectivity.
    Doctor,
}

fn parse_status(raw: &str) -> Result<OrderStatus, String> {
    OrderStatus::from_str(raw).map_err(|_| {
        let valid: Vec<String> = OrderStatus::ALL.iter().map(|s| s.to_string()).collect();
        format!("unknown status '{raw}' (expected one of: {})", valid.join(", "))
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => stockroom_config::load_and_validate_path(path),
        None => stockroom_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            stockroom_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    if let Err(e) = run(cli, &config).await {
        eprintln!("stockroom: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StockroomConfig) -> Result<(), StockroomError> {
    let client = RestClient::new(&config.store)?;
    let thresholds = StockThresholds::from(&config.inventory);
    let out = Output::from_flags(cli.json, cli.plain);

    match cli.command {
        Commands::Inventory => inventory::run_inventory(&client, &thresholds, &out).await,
        Commands::Alerts => inventory::run_alerts(&client, &thresholds, &out).await,
        Commands::Dashboard => dashboard::run_dashboard(&client, &thresholds, &out).await,
        Commands::Reservations { product_id } => {
            orders::run_reservations(&client, &ProductId::from(product_id), &out).await
        }
        Commands::Catalog { customer_id } => {
            catalog::run_catalog(&client, &CustomerId::from(customer_id), &thresholds, &out)
                .await
        }
        Commands::SetStatus { order_id, status } => {
            orders::run_set_status(&client, &OrderId::from(order_id), status, &out).await
        }
        Commands::Doctor => doctor::run_doctor(config, &client, &out).await,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `[logging] level`.
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockroom={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
