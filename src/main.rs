use clap::Parser;
use lobagg_rs::config::Settings;
use lobagg_rs::market_data::adapters::coinbase::CoinbaseAdapter;
use lobagg_rs::market_data::adapters::gemini::GeminiAdapter;
use lobagg_rs::market_data::adapters::{CachedVenue, VenueSource};
use lobagg_rs::market_data::router::{self, QuoteReport};
use lobagg_rs::telemetry;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "lobagg")]
#[command(about = "Price a market buy and sell against Coinbase + Gemini combined liquidity")]
struct Args {
    /// Quantity to price (defaults to `default_qty` from config, 10.0)
    #[arg(long)]
    qty: Option<f64>,

    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<String>,

    /// Number of times to quote in this process; repeats inside the cache window reuse cached books
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Pause between rounds, in milliseconds
    #[arg(long, default_value_t = 0)]
    pause_ms: u64,

    /// Never let two concurrent cache misses hit the same venue
    #[arg(long)]
    single_flight: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    telemetry::init_tracing(&settings.log_filter);
    telemetry::init_metrics(settings.metrics_port)?;

    let qty = args.qty.unwrap_or(settings.default_qty);
    let single_flight = args.single_flight || settings.single_flight;

    let client = reqwest::Client::builder()
        .timeout(settings.http_timeout())
        .user_agent(settings.user_agent.as_str())
        .build()?;

    let venues: Vec<Box<dyn VenueSource>> = vec![
        Box::new(CachedVenue::new(
            "Coinbase",
            CoinbaseAdapter::new(client.clone(), &settings.coinbase_url),
            settings.min_interval(),
            single_flight,
        )),
        Box::new(CachedVenue::new(
            "Gemini",
            GeminiAdapter::new(client, &settings.gemini_url),
            settings.min_interval(),
            single_flight,
        )),
    ];
    info!(qty, venues = venues.len(), min_interval_ms = settings.min_interval_ms, single_flight, "Starting");

    for round in 0..args.rounds {
        if round > 0 && args.pause_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.pause_ms)).await;
        }
        let report = router::quote(&venues, qty).await;
        print_report(&report, &settings.base_asset);
    }

    Ok(())
}

fn print_report(report: &QuoteReport, asset: &str) {
    for line in report_lines(report, asset) {
        println!("{line}");
    }
}

// qty uses Debug formatting so whole numbers keep their ".0" (10.0, not 10)
fn report_lines(report: &QuoteReport, asset: &str) -> Vec<String> {
    let mut lines: Vec<String> = report
        .failures
        .iter()
        .map(|failure| format!("Failed to fetch from {}: {}", failure.venue, failure.error))
        .collect();

    let sided = match &report.outcome {
        Ok(sided) => sided,
        Err(e) => {
            lines.push(e.to_string());
            return lines;
        }
    };

    lines.push(match &sided.buy_cost {
        Ok(cost) => format!("To buy {:?} {}: ${}", report.qty, asset, format_usd(*cost)),
        Err(e) => format!("Buy Error: {e}"),
    });
    lines.push(match &sided.sell_revenue {
        Ok(revenue) => format!("To sell {:?} {}: ${}", report.qty, asset, format_usd(*revenue)),
        Err(e) => format!("Sell Error: {e}"),
    });
    lines
}

// Two decimals with thousands separators, e.g. 1234567.891 -> "1,234,567.89"
fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
