//! fxconv - command-line front end for the currency converter
//!
//! ## Example Usage
//!
//! ```bash
//! # Convert 100 EUR to USD
//! fxconv convert 100 EUR USD
//!
//! # Convert, then swap the currencies and reuse the result
//! fxconv convert 100 EUR USD --swap
//!
//! # Explain how a rate is derived
//! fxconv resolve GBP JPY
//!
//! # List the rate table as JSON
//! fxconv rates --json
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use currency_converter::config::ConverterConfig;
use currency_converter::conversion::{format_fixed, ConversionResult, RATE_DECIMALS};
use currency_converter::currency::Currency;
use currency_converter::fx::{RateLookup, RateResolver, RateTable};
use currency_converter::notify::{Notification, NotificationKind, Notifier};
use currency_converter::session::ConversionSession;
use currency_converter::state::ConversionState;
use env_logger::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

/// fxconv: convert amounts between currencies
#[derive(Parser)]
#[command(name = "fxconv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert amounts between currencies", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount
    Convert {
        /// Amount to convert
        #[arg(value_name = "AMOUNT", allow_hyphen_values = true)]
        amount: String,

        /// Source currency code
        #[arg(value_name = "FROM", value_parser = parse_currency)]
        from: Currency,

        /// Target currency code
        #[arg(value_name = "TO", value_parser = parse_currency)]
        to: Currency,

        /// Swap the currencies afterwards, reusing the converted amount
        #[arg(short = 's', long)]
        swap: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective rate between two currencies and how it is derived
    Resolve {
        #[arg(value_name = "FROM", value_parser = parse_currency)]
        from: Currency,

        #[arg(value_name = "TO", value_parser = parse_currency)]
        to: Currency,
    },

    /// List the rate table
    Rates {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported currencies
    Currencies,
}

fn parse_currency(code: &str) -> Result<Currency, String> {
    code.parse::<Currency>().map_err(|e| e.to_string())
}

fn init_logger(verbose: bool) {
    let mut builder = Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_default_env();
    builder.init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = ConverterConfig::load(cli.config.as_deref());
    if cli.verbose {
        println!(
            "{} v{}",
            "fxconv".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Pivot: {}  Delay: {}",
            config.pivot.to_string().dimmed(),
            format!("{}ms", config.delay_ms).dimmed()
        );
    }

    let result = match cli.command {
        Commands::Convert {
            amount,
            from,
            to,
            swap,
            json,
        } => run_convert(&config, amount, from, to, swap, json).await,
        Commands::Resolve { from, to } => run_resolve(&config, from, to),
        Commands::Rates { json } => run_rates(&config, json),
        Commands::Currencies => {
            run_currencies();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn console_notifier(quiet: bool) -> Arc<dyn Notifier> {
    Arc::new(move |notification: &Notification| {
        if quiet {
            return;
        }
        let title = match notification.kind {
            NotificationKind::Success => notification.title.green().bold(),
            NotificationKind::Error => notification.title.red().bold(),
        };
        eprintln!("{} {}", title, notification.description.dimmed());
    })
}

async fn run_convert(
    config: &ConverterConfig,
    amount: String,
    from: Currency,
    to: Currency,
    swap: bool,
    json: bool,
) -> anyhow::Result<()> {
    let resolver = config.resolver().context("building rate table")?;
    let session_config = config.session_config();
    let initial = ConversionState {
        amount,
        from,
        to,
        ..ConversionState::new(session_config.race_policy)
    };
    let session = ConversionSession::with_state(
        resolver,
        console_notifier(json),
        session_config,
        initial,
    );

    let mut results = Vec::new();
    if session.convert_now().is_none() {
        bail!("invalid amount {:?}", session.state().amount);
    }
    results.push(wait_for_result(&session, json).await?);

    if swap {
        // an unchanged swap (same currency on both sides) enqueues nothing by itself
        if session.swap().is_none() && session.convert_now().is_none() {
            bail!("nothing to convert after swap");
        }
        results.push(wait_for_result(&session, json).await?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

async fn wait_for_result<L: RateLookup + 'static>(
    session: &ConversionSession<L>,
    quiet: bool,
) -> anyhow::Result<ConversionResult> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Converting...");
    pb.enable_steady_tick(Duration::from_millis(80));

    session.settle().await;
    pb.finish_and_clear();

    let state = session.state();
    if let Some(error) = state.error {
        bail!(error);
    }
    state
        .result
        .context("conversion produced no result")
}

fn print_result(result: &ConversionResult) {
    println!(
        "  {} {}",
        result.converted_display().bright_green().bold(),
        result.request.to.to_string().bold()
    );
    println!(
        "  {} {}",
        result.rate_summary(),
        format!("({})", result.path).dimmed()
    );
    println!();
}

fn run_resolve(config: &ConverterConfig, from: Currency, to: Currency) -> anyhow::Result<()> {
    let resolver: RateResolver<RateTable> = config.resolver()?;
    let resolution = resolver.resolve(from, to)?;

    println!(
        "1 {} = {} {}",
        from,
        format_fixed(resolution.rate, RATE_DECIMALS).bright_green().bold(),
        to
    );
    println!("  {} {}", "Path:".bold(), resolution.path);
    Ok(())
}

fn run_rates(config: &ConverterConfig, json: bool) -> anyhow::Result<()> {
    let table = config.rate_table()?;
    let entries = table.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Exchange Rates".cyan().bold());
    println!("{}", "==============".cyan());
    if entries.is_empty() {
        println!("{}", "  No rates in table.".dimmed());
    }
    for entry in entries {
        println!("  {:<8} {}", entry.pair().key().bold(), entry.rate);
    }
    Ok(())
}

fn run_currencies() {
    println!("{}", "Supported Currencies".cyan().bold());
    println!("{}", "====================".cyan());
    for currency in Currency::ALL {
        println!("  {}", currency.label());
    }
}
