//! amz-product-api - Command line client for the Amazon Product Advertising API

use amz_product_api::amazon::regions::Region;
use amz_product_api::commands::cart::{parse_add_items, parse_modify_items};
use amz_product_api::commands::{BrowseCommand, CartAction, CartCommand, LookupCommand, SearchCommand};
use amz_product_api::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-product-api",
    version,
    about = "Command line client for the Amazon Product Advertising API",
    long_about = "Look up, search and browse the Amazon catalog and manage remote carts through \
                  signed Product Advertising API requests."
)]
struct Cli {
    /// API locale (overrides config and AMZ_REGION)
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Maximum requests per second
    #[arg(long, global = true)]
    max_qps: Option<f64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up products by id
    #[command(alias = "l")]
    Lookup {
        /// Item id(s), space or comma separated
        #[arg(required = true)]
        ids: Vec<String>,

        /// Id type (ASIN, ISBN, EAN, UPC, SKU)
        #[arg(long)]
        id_type: Option<String>,
    },

    /// Search the catalog by keywords
    #[command(alias = "s")]
    Search {
        /// Search keywords
        keywords: String,

        /// Search index (All, Books, Electronics, ...)
        #[arg(short, long, default_value = "All")]
        index: String,

        /// Maximum number of results
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// Find products similar to the given ASINs
    Similar {
        #[arg(required = true)]
        asins: Vec<String>,
    },

    /// Look up browse nodes (categories)
    #[command(alias = "b")]
    BrowseNode {
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Manage a remote cart
    #[command(subcommand)]
    Cart(CartCommands),

    /// List supported regions
    Regions,
}

#[derive(Subcommand)]
enum CartCommands {
    /// Create a cart from OFFER_ID[:QTY] items
    Create {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Add OFFER_ID[:QTY] items to a cart
    Add {
        #[arg(long)]
        cart_id: String,
        #[arg(long)]
        hmac: String,
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Change quantities with CART_ITEM_ID:QTY items (0 removes)
    Modify {
        #[arg(long)]
        cart_id: String,
        #[arg(long)]
        hmac: String,
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Remove every item from a cart
    Clear {
        #[arg(long)]
        cart_id: String,
        #[arg(long)]
        hmac: String,
    },

    /// Show a cart
    Get {
        #[arg(long)]
        cart_id: String,
        #[arg(long)]
        hmac: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if cli.max_qps.is_some() {
        config.max_qps = cli.max_qps;
    }

    let output = match cli.command {
        Commands::Lookup { ids, id_type } => {
            LookupCommand::new(config).execute(&ids, id_type.as_deref()).await?
        }

        Commands::Search { keywords, index, max } => {
            if let Some(max) = max {
                config.max_results = max;
            }
            SearchCommand::new(config).execute(&keywords, &index).await?
        }

        Commands::Similar { asins } => LookupCommand::new(config).execute_similar(&asins).await?,

        Commands::BrowseNode { ids } => BrowseCommand::new(config).execute(&ids).await?,

        Commands::Cart(cart) => {
            let action = match cart {
                CartCommands::Create { items } => {
                    CartAction::Create { items: parse_add_items(&items)? }
                }
                CartCommands::Add { cart_id, hmac, items } => {
                    CartAction::Add { cart_id, hmac, items: parse_add_items(&items)? }
                }
                CartCommands::Modify { cart_id, hmac, items } => {
                    CartAction::Modify { cart_id, hmac, items: parse_modify_items(&items)? }
                }
                CartCommands::Clear { cart_id, hmac } => CartAction::Clear { cart_id, hmac },
                CartCommands::Get { cart_id, hmac } => CartAction::Get { cart_id, hmac },
            };
            CartCommand::new(config).execute(action).await?
        }

        Commands::Regions => {
            let mut lines = vec![
                "Supported regions:\n".to_string(),
                format!("{:<6} {:<20} {:<30} {:<10}", "Code", "Domain", "Endpoint", "Currency"),
                format!("{:-<6} {:-<20} {:-<30} {:-<10}", "", "", "", ""),
            ];
            for region in Region::all() {
                lines.push(format!(
                    "{:<6} {:<20} {:<30} {:<10}",
                    region.to_string(),
                    region.domain(),
                    region.endpoint_host(),
                    region.currency()
                ));
            }
            lines.join("\n")
        }
    };

    println!("{}", output);
    Ok(())
}
