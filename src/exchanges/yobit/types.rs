//! Raw YoBit response shapes
//!
//! YoBit mixes JSON numbers and numeric strings for the same fields depending on
//! the endpoint, so numeric fields go through the lenient deserializers in
//! [`flex`].

use rust_decimal::Decimal;
use serde::Deserialize;

pub mod flex {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn value_to_decimal(value: &Value) -> Option<Decimal> {
        let text = match value {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text.trim().to_string(),
            _ => return None,
        };
        if text.is_empty() {
            return None;
        }
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    pub fn value_to_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|n| n as i64)),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn value_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_decimal))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_i64))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_to_string))
    }
}

/// One entry of `info.pairs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitPairInfo {
    #[serde(default, deserialize_with = "flex::integer")]
    pub decimal_places: Option<i64>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub max_price: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub min_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub max_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub min_total: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub hidden: Option<i64>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub fee: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub fee_buyer: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub fee_seller: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitTicker {
    #[serde(default, deserialize_with = "flex::decimal")]
    pub high: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub low: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub avg: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub vol: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub vol_cur: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub last: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub buy: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub sell: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub updated: Option<i64>,
}

/// `[price, amount]` level of a depth response
#[derive(Debug, Clone, Deserialize)]
pub struct YobitLevel(pub serde_json::Value, pub serde_json::Value);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitDepth {
    #[serde(default)]
    pub asks: Option<Vec<YobitLevel>>,
    #[serde(default)]
    pub bids: Option<Vec<YobitLevel>>,
}

/// Public trade or own trade; the two shapes share one struct
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitTrade {
    #[serde(default, deserialize_with = "flex::string")]
    pub pair: Option<String>,
    #[serde(default, rename = "type")]
    pub side: Option<String>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub rate: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::string")]
    pub tid: Option<String>,
    #[serde(default, deserialize_with = "flex::string")]
    pub trade_id: Option<String>,
    #[serde(default, deserialize_with = "flex::string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub is_your_order: Option<i64>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub commission: Option<Decimal>,
    #[serde(default, rename = "commissionCurrency", deserialize_with = "flex::string")]
    pub commission_currency: Option<String>,
}

/// Order shape of `Trade`, `CancelOrder`, `OrderInfo` and `ActiveOrders`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitOrder {
    #[serde(default, deserialize_with = "flex::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flex::string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "flex::string")]
    pub init_order_id: Option<String>,
    #[serde(default, deserialize_with = "flex::string")]
    pub pair: Option<String>,
    #[serde(default, rename = "type")]
    pub side: Option<String>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub start_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub remains: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub received: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::decimal")]
    pub rate: Option<Decimal>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub timestamp_created: Option<i64>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub server_time: Option<i64>,
    #[serde(default, deserialize_with = "flex::string")]
    pub status: Option<String>,
}

/// `return` of the private `getInfo` call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YobitAccountInfo {
    #[serde(default)]
    pub funds: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub funds_incl_orders: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "flex::integer")]
    pub server_time: Option<i64>,
}
