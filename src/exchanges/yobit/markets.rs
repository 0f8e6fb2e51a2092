use super::conversions::{currency_code, symbol_from_market_id};
use crate::core::errors::ExchangeError;
use crate::core::types::{Market, Symbol};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Lookup tables over the exchange's market list
#[derive(Debug, Default)]
pub struct MarketIndex {
    by_id: BTreeMap<String, Market>,
    ids_by_symbol: HashMap<Symbol, String>,
    currency_ids: HashMap<String, String>,
}

impl MarketIndex {
    pub fn new(markets: Vec<Market>) -> Self {
        let mut index = Self::default();
        for market in markets {
            for currency_id in [&market.base_id, &market.quote_id] {
                index
                    .currency_ids
                    .entry(currency_code(currency_id))
                    .or_insert_with(|| currency_id.clone());
            }
            index
                .ids_by_symbol
                .insert(market.symbol.clone(), market.id.clone());
            index.by_id.insert(market.id.clone(), market);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Every market id in lexical order
    pub fn ids(&self) -> Vec<&str> {
        self.by_id.keys().map(String::as_str).collect()
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.by_id.values()
    }

    pub fn market(&self, symbol: &Symbol) -> Result<&Market, ExchangeError> {
        self.ids_by_symbol
            .get(symbol)
            .and_then(|id| self.by_id.get(id))
            .ok_or_else(|| ExchangeError::BadSymbol(format!("yobit does not have market symbol {}", symbol)))
    }

    pub fn market_by_id(&self, market_id: &str) -> Option<&Market> {
        self.by_id.get(market_id)
    }

    /// Market ids for `symbols`, in the same order
    pub fn market_ids(&self, symbols: &[Symbol]) -> Result<Vec<String>, ExchangeError> {
        symbols
            .iter()
            .map(|symbol| self.market(symbol).map(|m| m.id.clone()))
            .collect()
    }

    /// Unified symbol for a market id, derived from the id when the market is unknown
    pub fn safe_symbol(&self, market_id: &str) -> Option<Symbol> {
        self.market_by_id(market_id)
            .map(|m| m.symbol.clone())
            .or_else(|| symbol_from_market_id(market_id))
    }

    /// Exchange currency id for a unified currency code
    pub fn currency_id(&self, code: &str) -> Result<&str, ExchangeError> {
        self.currency_ids
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ExchangeError::Exchange(format!("yobit does not have currency code {}", code)))
    }
}

/// Market index loaded once on first use and shared by the sub-connectors
#[derive(Debug, Default)]
pub struct MarketCache {
    inner: RwLock<Option<Arc<MarketIndex>>>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached index, or the result of `load` stored for later calls
    ///
    /// Concurrent first callers wait on one load; a failed load is not cached.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<MarketIndex>, ExchangeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Market>, ExchangeError>>,
    {
        if let Some(index) = self.inner.read().await.as_ref() {
            return Ok(Arc::clone(index));
        }

        let mut guard = self.inner.write().await;
        if let Some(index) = guard.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(MarketIndex::new(load().await?));
        debug!(markets = index.len(), "Loaded YoBit markets");
        *guard = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Replace the cached index
    pub async fn store(&self, markets: Vec<Market>) -> Arc<MarketIndex> {
        let index = Arc::new(MarketIndex::new(markets));
        *self.inner.write().await = Some(Arc::clone(&index));
        index
    }
}
