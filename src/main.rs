use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use catalog_prices::clients::HttpCatalogProvider;
use catalog_prices::config::Settings;
use catalog_prices::services::{
    CatalogService, GetProductByAsin, SearchProducts, ServiceTimeouts,
};
use catalog_prices::store::MongoPriceStore;
use catalog_prices::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Query the product catalog with competitor prices")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one product by ASIN, merged with competitor prices.
    Lookup {
        asin: String,
    },
    /// Search the catalog.
    Search {
        #[arg(default_value = "")]
        keywords: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info")?;

    let cli = Cli::parse();
    let settings = Settings::new()?;

    let provider = Arc::new(HttpCatalogProvider::new(settings.provider.clone())?);
    let price_store = Arc::new(MongoPriceStore::new(&settings.price_store).await?);
    let repository = Arc::new(CatalogService::new(
        provider,
        price_store,
        ServiceTimeouts::from_settings(&settings),
    ));

    let output = match cli.command {
        Command::Lookup { asin } => {
            info!(asin = %asin, "Looking up product");
            let product = GetProductByAsin::new(repository).execute(&asin).await?;
            serde_json::to_string_pretty(&product)?
        }
        Command::Search { keywords, page, category } => {
            info!(keywords = %keywords, page = page, category = %category, "Searching catalog");
            let result = SearchProducts::new(repository)
                .execute(&keywords, page, &category)
                .await?;
            serde_json::to_string_pretty(&result)?
        }
    };

    println!("{output}");

    Ok(())
}
