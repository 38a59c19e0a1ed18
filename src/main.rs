//! p2p-matcher - Demo Entry Point
//!
//! Seeds one market with on-pool suppliers, runs a supplier match against
//! it and logs the resulting balances.

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use p2p_matcher::config::{self, AppConfig};
use p2p_matcher::types::ray::{from_ray, ray_mul, to_ray};
use p2p_matcher::{
    MarketIndexes, Markets, MatchingEngine, Population, Position, PositionUpdated, Side,
};

#[derive(Parser)]
#[command(name = "p2p-matcher", about = "Peer-to-peer matching overlay")]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a borrower's request against two seeded suppliers
    Demo {
        /// Underlying amount to match
        #[arg(long, default_value_t = 120)]
        amount: u64,
        /// Supplier pool index, as a decimal
        #[arg(long, default_value = "1.0")]
        pool_index: String,
        /// Supplier peer-to-peer index, as a decimal
        #[arg(long, default_value = "1.0")]
        p2p_index: String,
        /// Budget for the operation, defaults to the configured one
        #[arg(long)]
        budget: Option<u64>,
    },
}

fn init_logging(cfg: &AppConfig) {
    match cfg.logger.format {
        config::LogFormat::JSON => {
            tracing_subscriber::fmt()
                .json()
                .with_max_level(cfg.logger.level)
                .with_current_span(true)
                .init();
        }
        config::LogFormat::COMPACT => {
            tracing_subscriber::fmt()
                .compact()
                .with_max_level(cfg.logger.level)
                .init();
        }
    }
}

fn run_demo(
    cfg: &AppConfig,
    amount: u64,
    pool_index: &str,
    p2p_index: &str,
    budget: Option<u64>,
) -> Result<(), String> {
    let pool_index =
        to_ray(pool_index).ok_or_else(|| format!("invalid pool index {pool_index:?}"))?;
    let p2p_index =
        to_ray(p2p_index).ok_or_else(|| format!("invalid p2p index {p2p_index:?}"))?;
    let indexes = MarketIndexes {
        pool_supply: pool_index,
        p2p_supply: p2p_index,
        ..MarketIndexes::unit()
    };
    let budget = budget.unwrap_or(cfg.matching.default_budget);

    let mut markets = Markets::new(cfg.matching.max_sorted_users).map_err(|e| e.to_string())?;
    let market = markets.create_market(1).map_err(|e| e.to_string())?;
    market.update_position(Side::Supplier, 1, Position::new(100, 0));
    market.update_position(Side::Supplier, 2, Position::new(50, 0));

    info!(
        pool_index = from_ray(pool_index).unwrap_or_default(),
        p2p_index = from_ray(p2p_index).unwrap_or_default(),
        amount,
        budget,
        "running demo"
    );

    let engine = MatchingEngine::from_config(&cfg.matching);
    let mut events: Vec<PositionUpdated> = Vec::new();
    let outcome = engine
        .match_suppliers(market, &indexes, amount, budget, &mut events)
        .map_err(|e| e.to_string())?;

    for event in &events {
        info!(
            user = event.user_id,
            on_pool = event.on_pool,
            in_p2p = event.in_p2p,
            underlying_on_pool = ray_mul(event.on_pool, pool_index),
            underlying_in_p2p = ray_mul(event.in_p2p, p2p_index),
            encoded_len = event.to_bytes().map_or(0, |bytes| bytes.len()),
            "position updated"
        );
    }

    info!(
        moved = outcome.moved,
        remaining_for_pool = outcome.remaining(amount),
        budget_consumed = outcome.budget_consumed,
        iterations = outcome.iterations,
        next_head = ?market.registry_head(Side::Supplier, Population::OnPool),
        state_root = market.state_root_hex(),
        "demo finished"
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = match AppConfig::load(Path::new(&cli.config_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("could not load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cfg);

    let result = match cli.command {
        Commands::Demo {
            amount,
            pool_index,
            p2p_index,
            budget,
        } => run_demo(&cfg, amount, &pool_index, &p2p_index, budget),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}
