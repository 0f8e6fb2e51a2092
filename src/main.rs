use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use yobitx::core::config::ExchangeConfig;
use yobitx::core::traits::{AccountInfo, MarketDataSource, SymbolSelection};
use yobitx::{Symbol, YobitBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    // Credentials are optional; public data works without them
    let config = ExchangeConfig::from_env("YOBIT").unwrap_or_else(|_| ExchangeConfig::read_only());
    let authenticated = config.has_credentials();
    let yobit = YobitBuilder::new().with_config(config).build()?;

    let markets = yobit.get_markets().await.context("fetching markets")?;
    info!("Found {} markets", markets.len());
    for market in markets.iter().filter(|m| m.active).take(5) {
        info!(
            "Market: {} ({}), taker fee {:?}",
            market.symbol, market.id, market.taker
        );
    }

    let symbol: Symbol = "LTC/BTC".parse()?;
    let ticker = yobit.get_ticker(&symbol).await?;
    info!("{} last {:?} bid {:?} ask {:?}", symbol, ticker.last, ticker.bid, ticker.ask);

    let book = yobit.get_order_book(&symbol, Some(5)).await?;
    info!(
        "{} best bid {:?} best ask {:?}",
        symbol,
        book.bids.first().map(|e| e.price),
        book.asks.first().map(|e| e.price)
    );

    let tickers = yobit.get_tickers(SymbolSelection::all()).await?;
    info!("Fetched {} tickers across all markets", tickers.len());

    if authenticated {
        let balances = yobit.get_account_balance().await?;
        for (code, balance) in balances.balances.iter().filter(|(_, b)| b.total.is_some_and(|t| !t.is_zero())) {
            info!("{}: free {:?} total {:?}", code, balance.free, balance.total);
        }
    } else {
        warn!("YOBIT_API_KEY / YOBIT_SECRET_KEY not set, skipping private calls");
    }

    Ok(())
}
