use super::YobitShared;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{MarketDataSource, SymbolSelection};
use crate::core::types::{
    Market, OrderBook, OrderBooks, Symbol, Ticker, Tickers, Trade, TradingFee,
};
use crate::exchanges::yobit::conversions;
use crate::exchanges::yobit::markets::MarketIndex;
use crate::exchanges::yobit::types::{YobitDepth, YobitTicker, YobitTrade};
use crate::utils::batch::{self, ID_DELIMITER};
use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// YoBit market data implementation
#[derive(Debug)]
pub struct MarketData<R: RestClient> {
    shared: Arc<YobitShared<R>>,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(shared: Arc<YobitShared<R>>) -> Self {
        Self { shared }
    }

    /// Requested symbols and their market ids, in request order
    fn resolve_selection(
        index: &MarketIndex,
        symbols: Option<Vec<Symbol>>,
    ) -> Result<(Vec<Symbol>, Vec<String>), ExchangeError> {
        match symbols {
            Some(symbols) => {
                let ids = index.market_ids(&symbols)?;
                Ok((symbols, ids))
            }
            None => Ok(index
                .markets()
                .map(|m| (m.symbol.clone(), m.id.clone()))
                .unzip()),
        }
    }

    /// One `-`-joined id string per HTTP request for `selection`
    ///
    /// A selection without symbols or `all` is rejected unless `single_request_for_all`
    /// is set, in which case every market goes into one request.
    async fn plan(
        &self,
        selection: SymbolSelection,
        operation: &str,
        single_request_for_all: bool,
    ) -> Result<(Arc<MarketIndex>, HashSet<Symbol>, Vec<String>), ExchangeError> {
        let implicit_all = selection.symbols.is_none() && !selection.all;
        if implicit_all && !single_request_for_all {
            return Err(ExchangeError::ArgumentsRequired(format!(
                "yobit {}() requires \"symbols\" argument or `all` to send multiple requests for all markets",
                operation
            )));
        }

        let index = self.shared.market_index().await?;
        let (symbols, ids) = Self::resolve_selection(&index, selection.symbols)?;
        let budget = self.shared.options.url_budget();
        let requests = if implicit_all {
            if ids.is_empty() {
                Vec::new()
            } else {
                vec![batch::join_all_markets(&ids, ID_DELIMITER, budget, operation)?]
            }
        } else {
            batch::plan_requests(&ids, ID_DELIMITER, budget, selection.all, operation)?
        };
        debug!(
            markets = ids.len(),
            requests = requests.len(),
            "Planned {} requests",
            operation
        );
        Ok((index, symbols.into_iter().collect(), requests))
    }

    async fn fetch_ticker_batch(
        &self,
        pair_ids: &str,
        index: &MarketIndex,
    ) -> Result<Tickers, ExchangeError> {
        let response = self.shared.rest.get_tickers(pair_ids).await?;
        let mut tickers = Tickers::new();
        for (market_id, raw) in response.as_object().into_iter().flatten() {
            let Some(symbol) = index.safe_symbol(market_id) else {
                warn!(market_id = %market_id, "Skipping ticker for unrecognized market id");
                continue;
            };
            let ticker: YobitTicker = serde_json::from_value(raw.clone())?;
            tickers.insert(
                symbol.clone(),
                conversions::convert_yobit_ticker(&ticker, symbol, raw.clone()),
            );
        }
        Ok(tickers)
    }

    async fn fetch_order_book_batch(
        &self,
        pair_ids: &str,
        limit: Option<u32>,
        index: &MarketIndex,
    ) -> Result<OrderBooks, ExchangeError> {
        let response = self.shared.rest.get_depth(pair_ids, limit).await?;
        let mut books = OrderBooks::new();
        for (market_id, raw) in response.as_object().into_iter().flatten() {
            let Some(symbol) = index.safe_symbol(market_id) else {
                warn!(market_id = %market_id, "Skipping order book for unrecognized market id");
                continue;
            };
            let depth: YobitDepth = serde_json::from_value(raw.clone())?;
            books.insert(
                symbol.clone(),
                conversions::convert_yobit_order_book(&depth, symbol),
            );
        }
        Ok(books)
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let markets = self.shared.fetch_markets().await?;
        self.shared.markets.store(markets.clone()).await;
        Ok(markets)
    }

    async fn get_ticker(&self, symbol: &Symbol) -> Result<Ticker, ExchangeError> {
        let mut tickers = self
            .get_tickers(SymbolSelection::explicit(vec![symbol.clone()]))
            .await?;
        tickers.remove(symbol).ok_or_else(|| {
            ExchangeError::Exchange(format!("yobit {} ticker is not available", symbol))
        })
    }

    #[instrument(skip(self, selection), fields(exchange = "yobit", all = selection.all))]
    async fn get_tickers(&self, selection: SymbolSelection) -> Result<Tickers, ExchangeError> {
        let (index, wanted, requests) = self.plan(selection, "fetchTickers", false).await?;

        let parts = try_join_all(
            requests
                .iter()
                .map(|pair_ids| self.fetch_ticker_batch(pair_ids, &index)),
        )
        .await?;

        let mut tickers = batch::merge_partitions(parts);
        tickers.retain(|symbol, _| wanted.contains(symbol));
        Ok(tickers)
    }

    #[instrument(skip(self), fields(exchange = "yobit", symbol = %symbol))]
    async fn get_order_book(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let index = self.shared.market_index().await?;
        let market = index.market(symbol)?;
        let response = self.shared.rest.get_depth(&market.id, limit).await?;

        let raw = response.get(&market.id).ok_or_else(|| {
            ExchangeError::Exchange(format!(
                "yobit {} order book is empty or not available",
                market.symbol
            ))
        })?;
        let depth: YobitDepth = serde_json::from_value(raw.clone())?;
        Ok(conversions::convert_yobit_order_book(
            &depth,
            market.symbol.clone(),
        ))
    }

    #[instrument(skip(self, selection), fields(exchange = "yobit", all = selection.all))]
    async fn get_order_books(
        &self,
        selection: SymbolSelection,
        limit: Option<u32>,
    ) -> Result<OrderBooks, ExchangeError> {
        let (index, wanted, requests) = self.plan(selection, "fetchOrderBooks", true).await?;

        let parts = try_join_all(
            requests
                .iter()
                .map(|pair_ids| self.fetch_order_book_batch(pair_ids, limit, &index)),
        )
        .await?;

        let mut books = batch::merge_partitions(parts);
        books.retain(|symbol, _| wanted.contains(symbol));
        Ok(books)
    }

    #[instrument(skip(self), fields(exchange = "yobit", symbol = %symbol))]
    async fn get_trades(
        &self,
        symbol: &Symbol,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let index = self.shared.market_index().await?;
        let market = index.market(symbol)?;
        let response = self.shared.rest.get_trades(&market.id, limit).await?;

        // a market without trades answers with a bare empty array
        let raw_trades = match response.get(&market.id) {
            Some(Value::Array(trades)) => trades.as_slice(),
            _ => &[],
        };

        let mut trades = Vec::with_capacity(raw_trades.len());
        for raw in raw_trades {
            let trade: YobitTrade = serde_json::from_value(raw.clone())?;
            trades.push(conversions::convert_yobit_trade(
                &trade,
                raw.clone(),
                &index,
                Some(market),
            ));
        }
        Ok(conversions::filter_by_since_limit(
            trades,
            since,
            limit,
            |t| t.timestamp,
        ))
    }

    async fn get_trading_fees(&self) -> Result<Vec<TradingFee>, ExchangeError> {
        let index = self.shared.market_index().await?;
        let response = self.shared.rest.get_info().await?;
        Ok(conversions::convert_yobit_trading_fees(&response, &index))
    }
}
