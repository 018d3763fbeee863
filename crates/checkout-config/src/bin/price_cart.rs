//! # price-cart
//!
//! Prices a list of scanned SKUs against a pricing configuration.
//!
//! ## Usage
//! ```bash
//! # Scan SKUs one unit at a time
//! cargo run -p checkout-config --bin price-cart -- A B A A C
//!
//! # Explicit quantities and config file
//! cargo run -p checkout-config --bin price-cart -- \
//!     --config crates/checkout-config/pricing.example.toml A=5 B=3 C=2
//!
//! # Compare against the optimal strategy, print JSON receipt
//! cargo run -p checkout-config --bin price-cart -- --strategy optimal --json A=8
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see per-line pricing.

use std::env;
use std::path::PathBuf;

use checkout_config::PricingConfig;
use checkout_core::{LineGrouping, Receipt, StrategyKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("price-cart - price scanned SKUs with bulk offers");
    println!();
    println!("Usage: price-cart [OPTIONS] SKU[=QTY]...");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>      Pricing config (.toml or .json)");
    println!("  -s, --strategy <KIND>    greedy | optimal");
    println!("  -g, --grouping <KIND>    aggregate_by_sku | per_line");
    println!("      --json               Print the receipt as JSON");
    println!("  -h, --help               Show this help message");
}

fn parse_entry(arg: &str) -> Result<(String, i64), Box<dyn std::error::Error>> {
    match arg.split_once('=') {
        Some((sku, qty)) => {
            let qty = qty
                .parse::<i64>()
                .map_err(|e| format!("invalid quantity in '{}': {}", arg, e))?;
            Ok((sku.to_string(), qty))
        }
        None => Ok((arg.to_string(), 1)),
    }
}

fn print_receipt(receipt: &Receipt) {
    for line in &receipt.lines {
        println!(
            "{:<12} {:>4} x {:>10} = {:>12}",
            line.sku,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string()
        );
        for app in &line.applications {
            println!(
                "{:<12} {:>4} x {} for {}",
                "", app.times, app.threshold_quantity, app.bundle_price
            );
        }
    }
    println!("{}", "-".repeat(44));
    println!("{:<30} {:>13}", "Subtotal", receipt.subtotal.to_string());
    println!("{:<30} {:>13}", "Savings", receipt.savings().to_string());
    println!("{:<30} {:>13}", "Total", receipt.total.to_string());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut strategy: Option<StrategyKind> = None;
    let mut grouping: Option<LineGrouping> = None;
    let mut json = false;
    let mut entries: Vec<(String, i64)> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).ok_or("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--strategy" | "-s" => {
                i += 1;
                let kind = args.get(i).ok_or("--strategy needs a value")?;
                strategy = Some(kind.parse()?);
            }
            "--grouping" | "-g" => {
                i += 1;
                let kind = args.get(i).ok_or("--grouping needs a value")?;
                grouping = Some(kind.parse()?);
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => entries.push(parse_entry(other)?),
        }
        i += 1;
    }

    let mut config = PricingConfig::load(config_path)?;
    if let Some(strategy) = strategy {
        config.engine.strategy = strategy;
    }
    if let Some(grouping) = grouping {
        config.engine.grouping = grouping;
    }

    let engine = config.build_engine()?;
    let cart = config
        .price_list()
        .cart_from_quantities(entries.iter().map(|(sku, qty)| (sku.as_str(), *qty)))?;

    info!(
        lines = cart.len(),
        units = cart.total_quantity(),
        strategy = engine.strategy_name(),
        "Pricing cart"
    );

    let receipt = engine.price(Some(&cart))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        print_receipt(&receipt);
    }

    Ok(())
}
