use anyhow::{Context, Result};
use clap::Parser;
use paygate_client::utils::money::parse_currency;
use paygate_client::{Config, FixedDelay, PaymentClient, PaymentRequest};
use serde_json::Map;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_API_KEY: &str = "demo-api-key";

const SAMPLE_URLS: &[&str] = &[
    "https://api.paymentgateway.com",
    "https://sandbox.paymentgateway.com",
    "http://localhost:3000",
];

/// Sends a sample payment to one or more candidate API hosts and prints what
/// each of them answered.
#[derive(Debug, Parser)]
#[command(name = "payment-probe", version)]
struct Cli {
    /// TOML config file; environment variables still override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    api_key: Option<String>,

    /// Candidate base URL (repeatable)
    #[arg(short, long = "url")]
    urls: Vec<String>,

    /// Amount for the sample payment, e.g. "10.50" or "$1,250.00"
    #[arg(short, long)]
    amount: Option<String>,

    /// Pause between probes in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Pay once against the configured base URL instead of probing
    #[arg(long)]
    single: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?
            .with_env_overrides(),
        None => Config::from_env(),
    };
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if config.api_key.is_empty() {
        config.api_key = SAMPLE_API_KEY.to_string();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.probe_delay_ms = delay_ms;
    }

    let amount = match cli.amount.as_deref() {
        Some(raw) => parse_currency(raw).with_context(|| format!("invalid amount {:?}", raw))?,
        None => 10.5,
    };
    let request = sample_request(amount);
    let client = PaymentClient::from_config(&config).context("building payment client")?;

    if cli.single {
        info!("Paying once against {}", client.base_url());
        let response = client.pay(&request).await;
        let result = PaymentClient::handle_response(&response);
        println!("{}", serde_json::to_string_pretty(&response)?);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let urls: Vec<String> = if !cli.urls.is_empty() {
        cli.urls
    } else if !config.candidate_urls.is_empty() {
        config.candidate_urls.clone()
    } else {
        SAMPLE_URLS.iter().map(|url| url.to_string()).collect()
    };

    info!(
        "Probing {} candidate URLs, {:?} apart",
        urls.len(),
        Duration::from_millis(config.probe_delay_ms)
    );
    let delay = FixedDelay::new(config.probe_delay());
    let outcomes = client.probe_urls_with(&request, &urls, &delay).await;

    for outcome in &outcomes {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }

    match outcomes.iter().find(|outcome| outcome.is_success()) {
        Some(outcome) => info!("First URL that accepted the payment: {}", outcome.url),
        None => info!("No candidate URL accepted the payment"),
    }

    Ok(())
}

fn sample_request(amount: f64) -> PaymentRequest {
    PaymentRequest {
        client_name: "John Doe".to_string(),
        client_email: "john.doe@example.com".to_string(),
        client_phone: "+1 555 0100".to_string(),
        description: "Test payment".to_string(),
        amount,
        card_holder: "JOHN DOE".to_string(),
        card_number: "4111111111111111".to_string(),
        cvv: "123".into(),
        month: "12".into(),
        year: "2030".into(),
        amount_unit: None,
        extra: Map::new(),
    }
}
