mod config;
mod db;
mod error;
#[cfg(test)]
mod fake;
mod inventory;
mod lookup;
mod market;
mod oracle;
mod pricing;
mod scheduler;
mod trader;

use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, MAX_LISTINGS};
use db::Database;
use inventory::{InventoryEntry, InventorySource, ItemSheet, PrimeSheet};
use log::{error, info};
use lookup::ItemKeyTable;
use scheduler::Scheduler;
use std::io;
use trader::Trader;

pub type Result<T> = std::result::Result<T, error::Error>;

#[derive(Parser)]
#[command(version, about = "Keeps warframe.market sell orders in line with the competition")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Delete our listings and list the most valuable stocked items
    Create {
        #[arg(long, value_enum, default_value_t = Source::Prime)]
        source: Source,
        /// How many items to list, at most 100
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Reprice existing listings once
    Update,
    /// Print the cheapest offers for prime parts we are missing
    Wanted,
    /// Reprice existing listings on a schedule until Ctrl-C
    Watch,
    /// Copy the prime sheet into the local store
    Import,
    /// List the items in the local store
    Items,
    /// Print the local store as a JSON fixture
    Export,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    Prime,
    Items,
    Mods,
    Db,
}

fn menu() -> Result<Option<Command>> {
    println!("1. Create initial orders");
    println!("2. Update existing orders");

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;
    Ok(match choice.trim() {
        "1" => Some(Command::Create {
            source: Source::Prime,
            top_n: None,
        }),
        "2" => Some(Command::Update),
        _ => None,
    })
}

async fn load_inventory(
    source: Source,
    config: &Config,
    db: &Database,
) -> Result<Vec<InventoryEntry>> {
    match source {
        Source::Prime => PrimeSheet::load(&config.inventory_sheet)?.list_sellable(),
        Source::Items => ItemSheet::load(&config.item_sheet)?.list_sellable(),
        Source::Mods => ItemSheet::load(&config.mods_sheet)?.list_sellable(),
        Source::Db => db.list_sellable().await,
    }
}

fn build_trader(config: Config, db: Database) -> Result<Trader<wfmarket::Client>> {
    let client = wfmarket::Client::new(&config.base_url, config.request_delay)?;
    let keys = ItemKeyTable::load(&config.item_keys)?;
    Ok(Trader::new(client, config, keys, Some(db)))
}

async fn run(command: Command, config: Config) -> Result<()> {
    let db = Database::connect(&config.database_url).await?;

    match command {
        Command::Create { source, top_n } => {
            let inventory = load_inventory(source, &config, &db).await?;
            let top_n = top_n.unwrap_or(config.top_n).min(MAX_LISTINGS);
            info!("Loaded {} sellable items from {source:?}", inventory.len());

            let trader = build_trader(config, db)?;
            trader.create_listings(&inventory, top_n).await?.log_summary();
        }
        Command::Update => {
            let trader = build_trader(config, db)?;
            let session = trader.sign_in().await?;
            trader.update_listings(&session).await?.log_summary();
        }
        Command::Wanted => {
            let missing = PrimeSheet::load(&config.inventory_sheet)?.list_missing();
            let trader = build_trader(config, db)?;
            let list = trader.price_missing(&missing).await?;
            for (item, price) in &list.prices {
                match price {
                    Some(price) => println!("{item}: {price}"),
                    None => println!("{item}: no sellers in game"),
                }
            }
            list.log_summary();
        }
        Command::Watch => {
            let trader = build_trader(config, db)?;
            Scheduler::new(trader).await?.start().await?;
        }
        Command::Import => {
            let sheet = PrimeSheet::load(&config.inventory_sheet)?;
            let imported = db.import_parts(sheet.parts()).await?;
            info!(
                "Imported {imported} parts from {}",
                config.inventory_sheet.display()
            );
        }
        Command::Items => {
            for item in db.list_items().await? {
                println!(
                    "{:<40} {:>4} {:>4}  {}",
                    item.name,
                    item.quantity,
                    item.ducats,
                    item.item_key.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Export => {
            let items = db.list_items().await?;
            println!("{}", serde_json::to_string_pretty(&db::fixtures(&items))?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::setup_env();
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => match menu()? {
            Some(command) => command,
            None => {
                error!("Invalid choice");
                return Ok(());
            }
        },
    };

    let config = Config::from_env()?;
    run(command, config).await?;
    Ok(())
}
