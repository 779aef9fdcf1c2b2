//! Command-line interface for the rebalancing simulator.

use rebal::config::SimulationFileConfig;
use rebal::data::{load_csv, CsvConfig, CsvProvider};
use rebal::engine::{run_simulations, SimulationRequest, StrategyRun};
use rebal::error::{RebalError, Result};
use rebal::report;
use rebal::simulate::Frequency;
use rebal::strategy::WeightStrategy;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rebal - a walk-forward portfolio rebalancing simulator.
#[derive(Parser)]
#[command(name = "rebal")]
#[command(version = "0.1.0")]
#[command(about = "Simulate portfolio rebalancing strategies over historical prices")]
#[command(long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run simulations from command-line flags
    Run {
        /// Path to a wide CSV of adjusted closes
        #[arg(short, long)]
        data: PathBuf,

        /// Tickers to include (defaults to every column in the file)
        #[arg(short, long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Exclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Rebalancing frequency
        #[arg(short, long, value_enum, default_value = "monthly")]
        frequency: FrequencyArg,

        /// Strategies to compare (repeatable)
        #[arg(short = 'S', long = "strategy", value_enum)]
        strategies: Vec<StrategyArg>,

        /// Initial cash amount
        #[arg(short, long, default_value = "100000")]
        cash: f64,

        /// Print the weights history table per strategy
        #[arg(long)]
        weights: bool,
    },

    /// Run simulations from a TOML configuration file
    RunConfig {
        /// Path to the configuration file
        config: PathBuf,
    },

    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "rebal.toml")]
        output: PathBuf,
    },

    /// List the available weighting strategies
    Strategies,

    /// Validate a price data file
    Validate {
        /// Path to a wide CSV of adjusted closes
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Weekly,
    Monthly,
    Quarterly,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Quarterly => Frequency::Quarterly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    EqualWeight,
    RiskParity,
    RiskAllocation,
    Momentum,
}

impl From<StrategyArg> for WeightStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::EqualWeight => WeightStrategy::EqualWeight,
            StrategyArg::RiskParity => WeightStrategy::RiskParity,
            StrategyArg::RiskAllocation => WeightStrategy::RiskAllocation,
            StrategyArg::Momentum => WeightStrategy::Momentum,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level.
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    match &cli.command {
        Commands::Run {
            data,
            tickers,
            start,
            end,
            frequency,
            strategies,
            cash,
            weights,
        } => run_simulation(
            data,
            tickers,
            start,
            end,
            (*frequency).into(),
            strategies,
            *cash,
            *weights,
            cli.output,
        ),

        Commands::RunConfig { config } => run_from_config(config, cli.output),

        Commands::Init { output } => init_config(output),

        Commands::Strategies => {
            print_strategies();
            Ok(())
        }

        Commands::Validate { data } => validate_data(data),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    data_path: &PathBuf,
    tickers: &[String],
    start: &str,
    end: &str,
    frequency: Frequency,
    strategies: &[StrategyArg],
    cash: f64,
    show_weights: bool,
    output: OutputFormat,
) -> Result<()> {
    info!("Loading data from: {}", data_path.display());
    let provider = CsvProvider::from_path(data_path, &CsvConfig::default())?;

    let tickers = if tickers.is_empty() {
        provider.history().tickers().to_vec()
    } else {
        tickers.to_vec()
    };

    let strategies: Vec<WeightStrategy> = if strategies.is_empty() {
        WeightStrategy::all().to_vec()
    } else {
        strategies.iter().map(|&s| s.into()).collect()
    };

    let request = SimulationRequest {
        tickers,
        start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d")?,
        end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d")?,
        frequency,
        initial_cash: cash,
        strategies,
    };

    let runs = run_simulations(&request, &provider)?;
    present(&runs, &request, show_weights, output)
}

fn run_from_config(config_path: &PathBuf, output: OutputFormat) -> Result<()> {
    let config = SimulationFileConfig::load(config_path)?;
    let data_path = config.data.path.clone().ok_or_else(|| {
        RebalError::ConfigError("missing data.path in configuration".to_string())
    })?;

    let csv_config = CsvConfig {
        date_format: config.data.date_format.clone(),
        ..Default::default()
    };
    let provider = CsvProvider::from_path(&data_path, &csv_config)?;

    let mut request = config.to_request()?;
    if request.tickers.is_empty() {
        request.tickers = provider.history().tickers().to_vec();
    }
    if request.strategies.is_empty() {
        request.strategies = WeightStrategy::all().to_vec();
    }

    let runs = run_simulations(&request, &provider)?;
    present(&runs, &request, true, output)
}

fn present(
    runs: &[StrategyRun],
    request: &SimulationRequest,
    show_weights: bool,
    output: OutputFormat,
) -> Result<()> {
    if runs.is_empty() {
        println!("No simulations produced results; see warnings above.");
        return Ok(());
    }

    match output {
        OutputFormat::Json => {
            println!("{}", report::to_json(runs)?);
        }
        OutputFormat::Text => {
            for run in runs {
                report::print_summary(run, request.initial_cash);
                if show_weights {
                    println!();
                    println!("{}", report::weights_table(&run.result));
                }
            }
            println!();
            println!("{}", report::comparison_table(runs, request.initial_cash));
        }
    }

    Ok(())
}

fn init_config(output: &PathBuf) -> Result<()> {
    fs::write(output, SimulationFileConfig::example())?;
    println!("Wrote example configuration to {}", output.display());
    Ok(())
}

fn print_strategies() {
    println!("Available weighting strategies:");
    println!("  equal-weight     Every asset gets 1/n");
    println!("  risk-parity      Weight inversely proportional to volatility");
    println!("  risk-allocation  Weight proportional to volatility");
    println!("  momentum         Weight proportional to the latest period return");
}

fn validate_data(data_path: &PathBuf) -> Result<()> {
    let history = load_csv(data_path, &CsvConfig::default())?;
    println!("{}: OK", data_path.display());
    println!("  Tickers:      {}", history.tickers().join(", "));
    println!("  Observations: {}", history.len());
    if let (Some(start), Some(end)) = (history.start_date(), history.end_date()) {
        println!("  Range:        {} to {}", start, end);
    }
    Ok(())
}
