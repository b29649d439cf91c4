use anyhow::{Context, Result};
use clap::Parser;
use expense_forecast::history::{CsvHistory, TransactionHistoryProvider};
use expense_forecast::summary::summarize_months;
use expense_forecast::{ExpenseForecaster, ForecastConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "expense-forecast")]
#[command(about = "Forecast upcoming fixed and variable expenses", long_about = None)]
struct Cli {
    /// Transaction history CSV file
    #[arg(short, long)]
    data: PathBuf,

    /// Number of future months to forecast
    #[arg(short, long, default_value_t = 6)]
    months: usize,

    /// JSON configuration file
    #[arg(short, long, env = "FORECAST_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Number of past months to show as context
    #[arg(long, default_value_t = 6)]
    history_months: usize,

    /// Number of feature importances to show
    #[arg(long, default_value_t = 10)]
    top_features: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ForecastConfig::default(),
    };

    let history = CsvHistory::new(&cli.data);
    let records = history
        .fetch_transactions()
        .with_context(|| format!("failed to read history from {}", cli.data.display()))?;

    let summaries = summarize_months(&records);
    if !summaries.is_empty() && cli.history_months > 0 {
        println!("Recent history");
        println!(
            "{:<16} {:>12} {:>12} {:>12}",
            "Period", "Income", "Expense", "Savings"
        );
        let skip = summaries.len().saturating_sub(cli.history_months);
        for summary in &summaries[skip..] {
            println!("{}", summary);
        }
        println!();
    }

    let forecaster = ExpenseForecaster::with_config(history, config)?;
    let report = forecaster
        .forecast(cli.months)
        .context("expense forecast failed")?;

    println!("Forecast");
    print!("{}", report);

    if cli.top_features > 0 {
        println!("Top features:");
        for importance in report.importances.iter().take(cli.top_features) {
            println!("  {:<32} {:.4}", importance.feature, importance.importance);
        }
    }

    Ok(())
}
