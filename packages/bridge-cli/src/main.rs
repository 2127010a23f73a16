use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xcm_bridge_core::{address, bounds, Bridge, Registry, RouteFilter, RouteTable, TokenAmount};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry file (.toml or .json), the built-in registry when omitted
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the registry
    ValidateConfig,
    /// List routes from a chain
    Routes {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        token: Option<String>,
        /// Print the matching routes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Smallest amount the destination accepts for a transfer, from registry data alone
    MinInput {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        token: String,
    },
    /// Check an address against a chain's address format
    CheckAddress {
        #[arg(long)]
        chain: String,
        #[arg(long)]
        address: String,
    },
}

fn load_registry(config: Option<PathBuf>) -> Result<Registry> {
    let registry = match config {
        Some(path) => {
            info!("Loading registry from {:?}", path);
            Registry::load(&path).with_context(|| format!("invalid registry {}", path.display()))?
        }
        None => Registry::builtin().context("invalid built-in registry")?,
    };
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let registry = Arc::new(load_registry(cli.config)?);

    match cli.command {
        Commands::ValidateConfig => {
            println!("Registry is valid");
            println!("- Chains:");
            for chain in registry.chains() {
                let para = chain
                    .para_chain_id
                    .map(|id| format!("para {}", id))
                    .unwrap_or_else(|| "relay".to_string());
                println!(
                    "  - {} ({}): {}, native {}, ss58 {}",
                    chain.display, chain.id, para, chain.native_token, chain.ss58_prefix
                );
                let tokens: Vec<_> = registry.tokens(&chain.id).map(|t| t.symbol.as_str()).collect();
                println!("    tokens: {}", tokens.join(", "));
            }
            println!("- Routes: {}", registry.routes().len());
            Ok(())
        }
        Commands::Routes { from, to, token, json } => {
            let bridge = Bridge::from_registry(registry.clone())?;
            let router = bridge.router();
            let filter = RouteFilter { from: Some(from.clone()), to: to.clone(), token };
            let routes = router.routes(&filter);
            debug!(matches = routes.len(), "route query");

            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
                return Ok(());
            }
            match to {
                Some(to) => {
                    for route in routes {
                        println!(
                            "{} -> {}: {} (fee {} {}, weight {:?})",
                            route.from, to, route.token, route.fee.amount.0, route.fee.token, route.weight_limit
                        );
                    }
                }
                None => {
                    for destination in router.destinations_from(&from) {
                        let tokens: Vec<_> = router.tokens_for(&from, &destination).into_iter().collect();
                        println!("{} -> {}: {}", from, destination, tokens.join(", "));
                    }
                }
            }
            Ok(())
        }
        Commands::MinInput { from, to, token } => {
            let routes = RouteTable::new(registry.routes().iter().cloned());
            let route = routes.route_for(&from, &to, &token)?;
            let dest_token = registry
                .token(&to, &token)
                .with_context(|| format!("{} is not registered on {}", token, to))?;
            let fee_token = registry
                .token(&to, &route.fee.token)
                .with_context(|| format!("{} is not registered on {}", route.fee.token, to))?;
            let fee = TokenAmount {
                token: fee_token.symbol.clone(),
                amount: fee_token.amount(route.fee.amount.0),
            };
            let min = bounds::min_input(&token, &dest_token.ed(), &fee);
            debug!(from = %from, to = %to, token = %token, "offline min input");
            println!("min input: {} {}", min, token);
            println!("destination fee: {} {}", fee.amount, fee.token);
            Ok(())
        }
        Commands::CheckAddress { chain, address } => {
            let chain = registry
                .chain(&chain)
                .with_context(|| format!("unknown chain {}", chain))?;
            let account = address::decode_for(chain, &address)?;
            println!("valid {} address", chain.display);
            println!("account id: {}", address::to_hex(&account));
            println!("canonical: {}", address::encode(&account, chain.ss58_prefix));
            Ok(())
        }
    }
}
