use crate::core::errors::ExchangeError;
use crate::core::kernel::{RestClient, Signer};
use crate::core::traits::{
    AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer, SymbolSelection,
};
use crate::core::types::{
    Balances, DepositAddress, Market, Order, OrderBook, OrderBooks, OrderRequest, Symbol, Ticker,
    Tickers, Trade, TradingFee, Transaction,
};
use crate::exchanges::yobit::builder::YobitOptions;
use crate::exchanges::yobit::conversions;
use crate::exchanges::yobit::markets::{MarketCache, MarketIndex};
use crate::exchanges::yobit::rest::YobitRest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// State shared by the sub-connectors: one transport, one signer, one market cache
#[derive(Debug)]
pub struct YobitShared<R: RestClient> {
    pub rest: YobitRest<R>,
    pub markets: MarketCache,
    pub options: YobitOptions,
}

impl<R: RestClient> YobitShared<R> {
    pub async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let info = self.rest.get_info().await?;
        Ok(conversions::convert_yobit_markets(&info))
    }

    /// Market index, loading markets on first use
    pub async fn market_index(&self) -> Result<Arc<MarketIndex>, ExchangeError> {
        self.markets.get_or_load(|| self.fetch_markets()).await
    }
}

/// YoBit connector that composes all sub-trait implementations
pub struct YobitConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient> YobitConnector<R> {
    pub fn new(
        rest: R,
        base_url: &str,
        signer: Option<Arc<dyn Signer>>,
        options: YobitOptions,
    ) -> Self {
        let shared = Arc::new(YobitShared {
            rest: YobitRest::new(rest, base_url, signer),
            markets: MarketCache::new(),
            options,
        });
        Self {
            market: MarketData::new(Arc::clone(&shared)),
            trading: Trading::new(Arc::clone(&shared)),
            account: Account::new(shared),
        }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for YobitConnector<R> {
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.market.get_markets().await
    }

    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError> {
        self.market.get_ticker(symbol).await
    }

    async fn get_tickers(&self, selection: SymbolSelection) -> Result<Tickers, ExchangeError> {
        self.market.get_tickers(selection).await
    }

    async fn get_order_book(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        self.market.get_order_book(symbol, limit).await
    }

    async fn get_order_books(
        &self,
        selection: SymbolSelection,
        limit: Option<u32>,
    ) -> Result<OrderBooks, ExchangeError> {
        self.market.get_order_books(selection, limit).await
    }

    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_trades(symbol, since, limit).await
    }

    async fn get_trading_fees(&self) -> Result<Vec<TradingFee>, ExchangeError> {
        self.market.get_trading_fees().await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for YobitConnector<R> {
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        self.trading.place_order(order).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.trading.cancel_order(order_id).await
    }

    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        self.trading.get_order(order_id).await
    }

    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_open_orders(symbol, since, limit).await
    }

    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.trading.get_my_trades(symbol, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for YobitConnector<R> {
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError> {
        self.account.get_account_balance().await
    }

    async fn get_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError> {
        self.account.get_deposit_address(code, network).await
    }

    async fn create_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError> {
        self.account.create_deposit_address(code, network).await
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError> {
        self.account.withdraw(code, amount, address, tag).await
    }
}

impl<R: RestClient> ExchangeConnector for YobitConnector<R> {}
