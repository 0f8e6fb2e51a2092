use super::YobitShared;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{Market, Order, OrderRequest, OrderStatus, OrderType, Symbol, Trade};
use crate::exchanges::yobit::conversions;
use crate::exchanges::yobit::markets::MarketIndex;
use crate::exchanges::yobit::rest::YobitRest;
use crate::exchanges::yobit::types::{YobitOrder, YobitTrade};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// YoBit trading implementation
#[derive(Debug)]
pub struct Trading<R: RestClient> {
    shared: Arc<YobitShared<R>>,
}

fn parse_order(
    raw: Value,
    index: &MarketIndex,
    market: Option<&Market>,
) -> Result<Order, ExchangeError> {
    let order: YobitOrder = serde_json::from_value(raw.clone())?;
    Ok(conversions::convert_yobit_order(&order, raw, index, market))
}

fn numeric_order_id(order_id: &str) -> Result<u64, ExchangeError> {
    order_id.trim().parse().map_err(|_| {
        ExchangeError::InvalidOrder(format!("yobit order id must be numeric, got {}", order_id))
    })
}

fn require_symbol<'a>(symbol: Option<&'a Symbol>, operation: &str) -> Result<&'a Symbol, ExchangeError> {
    symbol.ok_or_else(|| {
        ExchangeError::ArgumentsRequired(format!(
            "yobit {}() requires a symbol argument",
            operation
        ))
    })
}

/// `return` entry with its map key injected under `key_field`
fn keyed_entry(key: &str, raw: &Value, key_field: &str) -> Value {
    let mut entry = raw.as_object().cloned().unwrap_or_default();
    entry.insert(key_field.to_string(), Value::String(key.to_string()));
    Value::Object(entry)
}

impl<R: RestClient> Trading<R> {
    pub fn new(shared: Arc<YobitShared<R>>) -> Self {
        Self { shared }
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self, order), fields(exchange = "yobit", symbol = %order.symbol, side = order.side.as_str()))]
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        if order.order_type == OrderType::Market {
            return Err(ExchangeError::Exchange(
                "yobit createOrder() allows limit orders only".to_string(),
            ));
        }
        let price = order.price.ok_or_else(|| {
            ExchangeError::ArgumentsRequired(
                "yobit createOrder() requires a price for limit orders".to_string(),
            )
        })?;

        let index = self.shared.market_index().await?;
        let market = index.market(&order.symbol)?;
        let amount = conversions::amount_to_precision(market, order.amount)?;
        let rate = conversions::price_to_precision(market, price);

        let response = self
            .shared
            .rest
            .trade(&market.id, order.side.as_str(), &amount, &rate)
            .await?;
        let result = Value::Object(YobitRest::<R>::return_object(&response));

        let mut placed = parse_order(result, &index, Some(market))?;
        placed.side.get_or_insert(order.side);
        if placed.price.is_none() {
            placed.price = rate.parse().ok();
            placed.cost = placed.price.zip(placed.filled).and_then(|(p, f)| p.checked_mul(f));
        }
        Ok(placed)
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn cancel_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        let numeric_id = numeric_order_id(order_id)?;
        let index = self.shared.market_index().await?;
        let response = self.shared.rest.cancel_order(numeric_id).await?;
        let result = YobitRest::<R>::return_object(&response);

        let has_status = result.contains_key("status");
        let mut canceled = parse_order(Value::Object(result), &index, None)?;
        if !has_status {
            canceled.status = OrderStatus::Canceled;
        }
        Ok(canceled)
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_order(&self, order_id: &str) -> Result<Order, ExchangeError> {
        let numeric_id = numeric_order_id(order_id)?;
        let index = self.shared.market_index().await?;
        let response = self.shared.rest.order_info(numeric_id).await?;
        let orders = YobitRest::<R>::return_object(&response);

        let key = numeric_id.to_string();
        let raw = orders
            .get(&key)
            .ok_or_else(|| ExchangeError::OrderNotFound(format!("yobit order {} not found", key)))?;
        parse_order(keyed_entry(&key, raw, "id"), &index, None)
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_open_orders(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let symbol = require_symbol(symbol, "fetchOpenOrders")?;
        let index = self.shared.market_index().await?;
        let market = index.market(symbol)?;
        let response = self.shared.rest.active_orders(&market.id).await?;

        let orders = YobitRest::<R>::return_object(&response)
            .iter()
            .map(|(id, raw)| parse_order(keyed_entry(id, raw, "id"), &index, None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(conversions::filter_by_since_limit(
            orders,
            since,
            limit,
            |o| o.timestamp,
        ))
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_my_trades(
        &self,
        symbol: Option<&Symbol>,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let symbol = require_symbol(symbol, "fetchMyTrades")?;
        let index = self.shared.market_index().await?;
        let market = index.market(symbol)?;
        let response = self
            .shared
            .rest
            .trade_history(&market.id, limit, since.map(|ms| ms / 1000))
            .await?;

        let mut trades = Vec::new();
        for (trade_id, raw) in YobitRest::<R>::return_object(&response) {
            let raw = keyed_entry(&trade_id, &raw, "trade_id");
            let trade: YobitTrade = serde_json::from_value(raw.clone())?;
            let trade = conversions::convert_yobit_trade(&trade, raw, &index, Some(market));
            if trade.symbol.as_ref() == Some(&market.symbol) {
                trades.push(trade);
            }
        }
        Ok(conversions::filter_by_since_limit(
            trades,
            since,
            limit,
            |t| t.timestamp,
        ))
    }
}
