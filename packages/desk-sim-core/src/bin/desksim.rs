//! Desk Sim CLI - Run simulations from the command line.
//!
//! This binary emits JSON for piping into other tooling.

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use desk_sim_core::{
    CompoundFrequency, MarketCondition, MonteCarloRunner, RiskTolerance, SimConfig, SimEngine,
};

#[derive(Parser)]
#[command(name = "desksim")]
#[command(about = "Trading desk simulator - stochastic runs and Monte Carlo batches")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Simulate {
        /// Days to simulate
        #[arg(short, long, default_value = "30")]
        days: u32,
        /// Starting capital
        #[arg(short, long, default_value = "1000")]
        capital: f64,
        /// Leverage multiplier
        #[arg(short, long, default_value = "25")]
        leverage: f64,
        /// Number of traders on the desk
        #[arg(short, long, default_value = "2")]
        traders: u32,
        /// Desk-wide trading hours per day
        #[arg(long, default_value = "8")]
        hours: u32,
        /// Market condition
        #[arg(short, long, value_enum, default_value = "normal")]
        market: MarketArg,
        /// Risk tolerance
        #[arg(short, long, value_enum, default_value = "moderate")]
        risk: RiskArg,
        /// Disable daily compounding
        #[arg(long)]
        no_compound: bool,
        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Include the last N trade log entries in the output
        #[arg(long, default_value = "0")]
        trades: usize,
    },
    /// Run a Monte Carlo batch
    MonteCarlo {
        /// Number of independent runs
        #[arg(short, long, default_value = "100")]
        runs: u32,
        /// Days per run
        #[arg(short, long, default_value = "30")]
        days: u32,
        /// Starting capital
        #[arg(short, long, default_value = "1000")]
        capital: f64,
        /// Leverage multiplier
        #[arg(short, long, default_value = "25")]
        leverage: f64,
        /// Market condition
        #[arg(short, long, value_enum, default_value = "normal")]
        market: MarketArg,
        /// Batch seed for a reproducible batch
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// List the built-in strategy catalog
    Strategies,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarketArg {
    Normal,
    Bull,
    Bear,
    Volatile,
}

impl From<MarketArg> for MarketCondition {
    fn from(arg: MarketArg) -> Self {
        match arg {
            MarketArg::Normal => MarketCondition::Normal,
            MarketArg::Bull => MarketCondition::Bull,
            MarketArg::Bear => MarketCondition::Bear,
            MarketArg::Volatile => MarketCondition::Volatile,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RiskArg {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<RiskArg> for RiskTolerance {
    fn from(arg: RiskArg) -> Self {
        match arg {
            RiskArg::Conservative => RiskTolerance::Conservative,
            RiskArg::Moderate => RiskTolerance::Moderate,
            RiskArg::Aggressive => RiskTolerance::Aggressive,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Simulate {
            days,
            capital,
            leverage,
            traders,
            hours,
            market,
            risk,
            no_compound,
            seed,
            trades,
        } => handle_simulate(
            days, capital, leverage, traders, hours, market, risk, no_compound, seed, trades,
        ),
        Commands::MonteCarlo {
            runs,
            days,
            capital,
            leverage,
            market,
            seed,
        } => handle_monte_carlo(runs, days, capital, leverage, market, seed),
        Commands::Strategies => handle_strategies(),
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_simulate(
    days: u32,
    capital: f64,
    leverage: f64,
    traders: u32,
    hours: u32,
    market: MarketArg,
    risk: RiskArg,
    no_compound: bool,
    seed: Option<u64>,
    trades: usize,
) -> desk_sim_core::Result<String> {
    let mut config = SimConfig::default()
        .with_starting_capital(capital)
        .with_leverage(leverage)
        .with_desk(traders, hours)
        .with_market_condition(market.into())
        .with_risk_tolerance(risk.into());
    if no_compound {
        config = config.with_compounding(CompoundFrequency::None);
    }

    let mut engine = SimEngine::new(config)?;
    if let Some(seed) = seed {
        engine = engine.with_seed(seed);
    }
    let result = engine.simulate(days);

    let tail_start = result.trade_log.len().saturating_sub(trades);
    let json = json!({
        "final_capital": result.final_capital,
        "total_growth_percent": result.total_growth_percent,
        "total_trades": result.total_trades,
        "actual_win_rate": result.actual_win_rate,
        "max_drawdown_percent": result.max_drawdown_percent,
        "sharpe_ratio": result.sharpe_ratio,
        "sortino_ratio": result.sortino_ratio,
        "calmar_ratio": result.calmar_ratio,
        "profit_factor": result.profit_factor,
        "total_fees": result.total_fees,
        "total_slippage": result.total_slippage,
        "days_completed": result.days_completed,
        "daily_results": result.daily_results,
        "trade_log": &result.trade_log[tail_start..],
        "generated_at": result.generated_at,
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

fn handle_monte_carlo(
    runs: u32,
    days: u32,
    capital: f64,
    leverage: f64,
    market: MarketArg,
    seed: Option<u64>,
) -> desk_sim_core::Result<String> {
    let config = SimConfig::default()
        .with_starting_capital(capital)
        .with_leverage(leverage)
        .with_market_condition(market.into());

    let mut runner = MonteCarloRunner::new(config, runs, days);
    if let Some(seed) = seed {
        runner = runner.with_seed(seed);
    }
    let summary = runner.run()?;
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn handle_strategies() -> desk_sim_core::Result<String> {
    let strategies = desk_sim_core::default_strategies();
    Ok(serde_json::to_string_pretty(&json!({
        "strategies": strategies,
    }))?)
}
