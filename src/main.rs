mod config;
mod error;
mod models;
mod pipeline;
mod server;
mod upstream;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::models::{Quote, QuoteRequest};
use crate::pipeline::QuoteService;
use crate::upstream::YahooChartSource;

#[derive(Parser)]
#[command(name = "nse-quote", about = "Normalized NSE market quotes", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP quote service
    Serve {
        /// Address to listen on (overrides server.bind_addr)
        #[arg(short, long, env = "NSE_QUOTE_BIND")]
        bind: Option<String>,
    },

    /// Fetch one quote and print it
    Quote {
        /// Ticker, e.g. RELIANCE, TCS.BO, ^NSEI
        symbol: String,

        /// Print the raw JSON response instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "nse_quote=info,tower_http=info,warn",
        1 => "nse_quote=debug,tower_http=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = AppConfig::load()?;

    let source = YahooChartSource::new(&config.upstream).context("Failed to build upstream source")?;
    let service = QuoteService::new(Arc::new(source));

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            server::serve(&config.server, service).await?;
        }

        Command::Quote { symbol, json } => {
            let quote = service.quote(&QuoteRequest::new(symbol)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_summary(&quote);
            }
        }
    }

    Ok(())
}

fn print_summary(q: &Quote) {
    let money = |v: Option<f64>| {
        v.map(|n| format!("{} {}", q.currency, utils::fmt_amount(n)))
            .unwrap_or_else(|| "—".into())
    };
    let change = match (q.change, q.change_percent) {
        (Some(c), Some(p)) => format!("{} ({})", utils::fmt_signed(c), utils::fmt_pct(p)),
        (Some(c), None) => utils::fmt_signed(c),
        (None, Some(p)) => utils::fmt_pct(p),
        (None, None) => "—".into(),
    };
    let name = q.long_name.clone().or_else(|| q.short_name.clone());

    println!("─────────────────────────────────");
    println!("  {}  {}", q.symbol, utils::or_dash(name));
    println!("─────────────────────────────────");
    println!("  Price    : {}", money(q.price));
    println!("  Prev     : {}", money(q.previous_close));
    println!("  Change   : {}", change);
    println!("  Exchange : {}", utils::or_dash(q.exchange_name.clone()));
    println!("  As of    : {}", utils::or_dash(q.market_time.clone()));
    println!("  Signal   : {}", q.bias().map(|b| b.label()).unwrap_or("—"));
    println!("─────────────────────────────────");
}
