use crate::core::{
    errors::ExchangeError,
    types::{
        Balances, DepositAddress, Market, Order, OrderBook, OrderBooks, OrderRequest, Symbol,
        Ticker, Tickers, Trade, TradingFee, Transaction,
    },
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Which markets a multi-market fetch should cover
///
/// `all` opts into splitting the request across as many HTTP calls as the URL
/// length budget requires. Without it an explicit list must fit in one request.
#[derive(Debug, Clone, Default)]
pub struct SymbolSelection {
    pub symbols: Option<Vec<Symbol>>,
    pub all: bool,
}

impl SymbolSelection {
    /// Every market the exchange lists, fetched in as many requests as needed
    pub fn all() -> Self {
        Self {
            symbols: None,
            all: true,
        }
    }

    /// An explicit list that must fit in a single request
    pub fn explicit(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols: Some(symbols),
            all: false,
        }
    }

    /// An explicit list that may be split across several requests
    pub fn split(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols: Some(symbols),
            all: true,
        }
    }
}

#[async_trait]
pub trait MarketDataSource {
    /// Get all available markets/trading pairs
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    /// Get 24h ticker statistics for one market
    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError>;

    /// Get tickers for several markets, keyed by symbol
    async fn get_tickers(&self, selection: SymbolSelection) -> Result<Tickers, ExchangeError>;

    /// Get the order book of one market
    async fn get_order_book(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError>;

    /// Get order books for several markets, keyed by symbol
    async fn get_order_books(
        &self,
        selection: SymbolSelection,
        limit: Option<u32>,
    ) -> Result<OrderBooks, ExchangeError>;

    /// Get recent public trades
    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;

    /// Get maker/taker fees for every market
    async fn get_trading_fees(&self) -> Result<Vec<TradingFee>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError>;

    /// Cancel an open order
    async fn cancel_order(&self, order_id: &str) -> Result<Order, ExchangeError>;

    /// Fetch one order by id
    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError>;

    /// Fetch open orders; `symbol` is required by this exchange
    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// Fetch the account's own trades; `symbol` is required by this exchange
    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError>;

    async fn get_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError>;

    async fn create_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError>;

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError>;
}

// Composite trait for when you need all functionality
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
