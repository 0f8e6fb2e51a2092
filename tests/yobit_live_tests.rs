
use integration_test_config::{utils, TestConfig};
use tokio::time::timeout;
use yobitx::core::traits::{AccountInfo, MarketDataSource, SymbolSelection};
use yobitx::core::types::Symbol;
use yobitx::exchanges::yobit::YobitBuilder;

fn ltc_btc() -> Symbol {
    Symbol::new("LTC", "BTC").unwrap()
}

#[cfg(test)]
mod live_tests {
    use super::*;

    #[tokio::test]
    async fn test_yobit_markets() {
        if !TestConfig::should_run_live_tests() {
            utils::print_warning("yobit markets", "set RUN_LIVE_TESTS=true to run");
            return;
        }
        let yobit = YobitBuilder::new().build().unwrap();

        match timeout(utils::default_timeout(), yobit.get_markets()).await {
            Ok(Ok(markets)) => {
                utils::print_test_result(
                    "yobit markets",
                    true,
                    &format!("fetched {} markets", markets.len()),
                );
                assert!(!markets.is_empty(), "Should have markets");
                assert!(markets.iter().any(|m| m.id == "ltc_btc"));
            }
            Ok(Err(e)) => utils::print_warning("yobit markets", &e.to_string()),
            Err(_) => utils::print_warning("yobit markets", "timed out"),
        }
    }

    #[tokio::test]
    async fn test_yobit_ticker_and_order_book() {
        if !TestConfig::should_run_live_tests() {
            return;
        }
        let yobit = YobitBuilder::new().build().unwrap();

        match timeout(utils::default_timeout(), yobit.get_ticker(&ltc_btc())).await {
            Ok(Ok(ticker)) => {
                println!("✅ YoBit LTC/BTC last {:?}", ticker.last);
                assert_eq!(ticker.symbol, ltc_btc());
            }
            Ok(Err(e)) => println!("⚠️ YoBit ticker failed: {}", e),
            Err(_) => println!("⚠️ YoBit ticker timed out"),
        }

        match timeout(
            utils::default_timeout(),
            yobit.get_order_book(&ltc_btc(), Some(10)),
        )
        .await
        {
            Ok(Ok(book)) => {
                println!(
                    "✅ YoBit LTC/BTC book: {} bids, {} asks",
                    book.bids.len(),
                    book.asks.len()
                );
                assert!(book.bids.len() <= 10);
                if let (Some(bid), Some(ask)) = (book.bids.first(), book.asks.first()) {
                    assert!(bid.price < ask.price);
                }
            }
            Ok(Err(e)) => println!("⚠️ YoBit order book failed: {}", e),
            Err(_) => println!("⚠️ YoBit order book timed out"),
        }
    }

    #[tokio::test]
    async fn test_yobit_all_tickers() {
        if !TestConfig::should_run_live_tests() {
            return;
        }
        let yobit = YobitBuilder::new().build().unwrap();

        let result = timeout(
            utils::default_timeout() * 4,
            yobit.get_tickers(SymbolSelection::all()),
        )
        .await;
        match result {
            Ok(Ok(tickers)) => {
                println!("✅ YoBit: fetched {} tickers", tickers.len());
                assert!(!tickers.is_empty());
            }
            Ok(Err(e)) => println!("⚠️ YoBit all tickers failed: {}", e),
            Err(_) => println!("⚠️ YoBit all tickers timed out"),
        }
    }

    #[tokio::test]
    async fn test_yobit_balance() {
        if !TestConfig::should_run_private_tests() {
            utils::print_warning("yobit balance", "set RUN_PRIVATE_TESTS=true to run");
            return;
        }
        let config = TestConfig::config_from_env();
        if !config.has_credentials() {
            utils::print_warning("yobit balance", "YOBIT_API_KEY / YOBIT_SECRET_KEY not set");
            return;
        }
        let yobit = YobitBuilder::new().with_config(config).build().unwrap();

        match timeout(utils::default_timeout(), yobit.get_account_balance()).await {
            Ok(Ok(balances)) => utils::print_test_result(
                "yobit balance",
                true,
                &format!("{} currencies", balances.balances.len()),
            ),
            Ok(Err(e)) => utils::print_test_result("yobit balance", false, &e.to_string()),
            Err(_) => utils::print_warning("yobit balance", "timed out"),
        }
    }
}
