use super::markets::MarketIndex;
use super::types::{
    flex, YobitAccountInfo, YobitDepth, YobitLevel, YobitOrder, YobitPairInfo, YobitTicker,
    YobitTrade,
};
use crate::core::errors::ExchangeError;
use crate::core::types::{
    iso8601, Balance, Balances, Fee, Market, MarketLimits, MarketPrecision, MinMax, Order,
    OrderBook, OrderBookEntry, OrderSide, OrderStatus, OrderType, Symbol, Ticker, Trade,
    TradingFee,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Unified code for an upper-cased YoBit currency id
///
/// YoBit reuses tickers that other venues assign to different assets, so a
/// number of ids are renamed.
pub fn common_currency_code(code: &str) -> String {
    let mapped = match code {
        "XBT" => "BTC",
        "BCHSV" => "BSV",
        "AIR" => "AirCoin",
        "ANI" => "ANICoin",
        "ANT" => "AntsCoin",
        "ATMCHA" => "ATM",
        "ASN" => "Ascension",
        "AST" => "Astral",
        "ATM" => "Autumncoin",
        "AUR" => "AuroraCoin",
        "BAB" => "Babel",
        "BAN" => "BANcoin",
        "BCC" => "BCH",
        "BCS" => "BitcoinStake",
        "BITS" => "Bitstar",
        "BLN" => "Bulleon",
        "BNS" => "Benefit Bonus Coin",
        "BOT" => "BOTcoin",
        "BON" => "BONES",
        "BPC" => "BitcoinPremium",
        "BST" => "BitStone",
        "BTS" => "Bitshares2",
        "CAT" => "BitClave",
        "CBC" => "CryptoBossCoin",
        "CMT" => "CometCoin",
        "COIN" => "Coin.com",
        "COV" => "Coven Coin",
        "COVX" => "COV",
        "CPC" => "Capricoin",
        "CREDIT" => "Creditbit",
        "CS" => "CryptoSpots",
        "DCT" => "Discount",
        "DFT" => "DraftCoin",
        "DGD" => "DarkGoldCoin",
        "DIRT" => "DIRTY",
        "DROP" => "FaucetCoin",
        "DSH" => "DASH",
        "EGC" => "EverGreenCoin",
        "EGG" => "EggCoin",
        "EKO" => "EkoCoin",
        "ENTER" => "ENTRC",
        "EPC" => "ExperienceCoin",
        "ESC" => "EdwardSnowden",
        "EUROPE" => "EUROP",
        "EXT" => "LifeExtension",
        "FUND" => "FUNDChains",
        "FUNK" => "FUNKCoin",
        "FX" => "FCoin",
        "GCC" => "GlobalCryptocurrency",
        "GEN" => "Genstake",
        "GENE" => "Genesiscoin",
        "GMR" => "Gimmer",
        "GOLD" => "GoldMint",
        "GOT" => "Giotto Coin",
        "GSX" => "GlowShares",
        "GT" => "GTcoin",
        "HTML5" => "HTML",
        "HYPERX" => "HYPER",
        "ICN" => "iCoin",
        "INSANE" => "INSN",
        "JNT" => "JointCoin",
        "JPC" => "JupiterCoin",
        "JWL" => "Jewels",
        "KNC" => "KingN Coin",
        "LBTCX" => "LiteBitcoin",
        "LIZI" => "LiZi",
        "LOC" => "LocoCoin",
        "LOCX" => "LOC",
        "LUNYR" => "LUN",
        "LUN" => "LunarCoin",
        "LUNA" => "Luna Coin",
        "MASK" => "Yobit MASK",
        "MDT" => "Midnight",
        "MEME" => "Memez Token",
        "MIS" => "MIScoin",
        "MM" => "MasterMint",
        "NAV" => "NavajoCoin",
        "NBT" => "NiceBytes",
        "OMG" => "OMGame",
        "ONX" => "Onix",
        "PAC" => "$PAC",
        "PLAY" => "PlayCoin",
        "PIVX" => "Darknet",
        "PURE" => "PurePOS",
        "PUTIN" => "PutinCoin",
        "SPACE" => "Spacecoin",
        "STK" => "StakeCoin",
        "SUB" => "Subscriptio",
        "PAY" => "EPAY",
        "PLC" => "Platin Coin",
        "RAI" => "RaiderCoin",
        "RCN" => "RCoin",
        "REP" => "Republicoin",
        "RUR" => "RUB",
        "SBTC" => "Super Bitcoin",
        "SMC" => "SmartCoin",
        "SOLO" => "SoloCoin",
        "SOUL" => "SoulCoin",
        "STAR" => "StarCoin",
        "SUPER" => "SuperCoin",
        "TNS" => "Transcodium",
        "TTC" => "TittieCoin",
        "UNI" => "Universe",
        "UST" => "Uservice",
        "VOL" => "VolumeCoin",
        "XIN" => "XINCoin",
        "XMT" => "SummitCoin",
        "XRA" => "Ratecoin",
        "BCHN" => "BSV",
        other => other,
    };
    mapped.to_string()
}

/// Unified code for a raw (lower-case) YoBit currency id
pub fn currency_code(currency_id: &str) -> String {
    common_currency_code(&currency_id.to_uppercase())
}

/// Unified symbol for a `base_quote` market id that is not in the market index
pub fn symbol_from_market_id(market_id: &str) -> Option<Symbol> {
    let (base_id, quote_id) = market_id.split_once('_')?;
    Symbol::new(currency_code(base_id), currency_code(quote_id)).ok()
}

/// Tick size for a number of decimal places
pub fn precision_from_places(places: Option<i64>) -> Option<Decimal> {
    let places = u32::try_from(places?).ok()?;
    (places <= 28).then(|| Decimal::new(1, places))
}

fn percent_to_rate(percent: Option<Decimal>) -> Option<Decimal> {
    percent.map(|p| p / Decimal::ONE_HUNDRED)
}

/// Milliseconds for a server timestamp in seconds, `None` when out of range
fn seconds_to_ms(seconds: Option<i64>) -> Option<i64> {
    seconds?.checked_mul(1000)
}

pub fn convert_yobit_market(
    market_id: &str,
    pair: &YobitPairInfo,
    info: Value,
) -> Result<Market, ExchangeError> {
    let (base_id, quote_id) = market_id.split_once('_').ok_or_else(|| {
        ExchangeError::DeserializationError(format!("Malformed market id: {}", market_id))
    })?;
    let symbol = Symbol::new(currency_code(base_id), currency_code(quote_id))
        .map_err(|e| ExchangeError::DeserializationError(e.to_string()))?;

    let fee = percent_to_rate(pair.fee);
    let precision = precision_from_places(pair.decimal_places);

    Ok(Market {
        id: market_id.to_string(),
        symbol,
        base_id: base_id.to_string(),
        quote_id: quote_id.to_string(),
        active: pair.hidden == Some(0),
        taker: fee,
        maker: fee,
        precision: MarketPrecision {
            amount: precision,
            price: precision,
        },
        limits: MarketLimits {
            amount: MinMax {
                min: pair.min_amount,
                max: pair.max_amount,
            },
            price: MinMax {
                min: pair.min_price,
                max: pair.max_price,
            },
            cost: MinMax {
                min: pair.min_total,
                max: None,
            },
        },
        info,
    })
}

/// Markets from an `info` response; malformed entries are skipped with a warning
pub fn convert_yobit_markets(response: &Value) -> Vec<Market> {
    let Some(pairs) = response.get("pairs").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut markets = Vec::with_capacity(pairs.len());
    for (market_id, raw) in pairs {
        let converted = serde_json::from_value::<YobitPairInfo>(raw.clone())
            .map_err(ExchangeError::from)
            .and_then(|pair| convert_yobit_market(market_id, &pair, raw.clone()));
        match converted {
            Ok(market) => markets.push(market),
            Err(e) => warn!(market_id = %market_id, "Failed to convert YoBit market: {}", e),
        }
    }
    markets
}

pub fn convert_yobit_trading_fees(response: &Value, index: &MarketIndex) -> Vec<TradingFee> {
    let Some(pairs) = response.get("pairs").and_then(Value::as_object) else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter_map(|(market_id, raw)| {
            let symbol = index.safe_symbol(market_id)?;
            let pair: YobitPairInfo = serde_json::from_value(raw.clone()).unwrap_or_default();
            Some(TradingFee {
                symbol,
                taker: percent_to_rate(pair.fee_buyer),
                maker: percent_to_rate(pair.fee_seller),
                percentage: true,
                tier_based: false,
                info: raw.clone(),
            })
        })
        .collect()
}

pub fn convert_yobit_ticker(ticker: &YobitTicker, symbol: Symbol, info: Value) -> Ticker {
    let timestamp = seconds_to_ms(ticker.updated);
    Ticker {
        symbol,
        timestamp,
        datetime: iso8601(timestamp),
        high: ticker.high,
        low: ticker.low,
        bid: ticker.buy,
        ask: ticker.sell,
        last: ticker.last,
        close: ticker.last,
        average: ticker.avg,
        base_volume: ticker.vol_cur,
        quote_volume: ticker.vol,
        info,
    }
}

fn convert_levels(levels: Option<&Vec<YobitLevel>>) -> Vec<OrderBookEntry> {
    levels
        .map(|levels| {
            levels
                .iter()
                .filter_map(|YobitLevel(price, amount)| {
                    Some(OrderBookEntry {
                        price: flex::value_to_decimal(price)?,
                        amount: flex::value_to_decimal(amount)?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Order book with bids sorted high to low and asks low to high
pub fn convert_yobit_order_book(depth: &YobitDepth, symbol: Symbol) -> OrderBook {
    let mut bids = convert_levels(depth.bids.as_ref());
    let mut asks = convert_levels(depth.asks.as_ref());
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    OrderBook {
        symbol,
        bids,
        asks,
        timestamp: None,
    }
}

fn parse_side(side: Option<&str>) -> Option<OrderSide> {
    match side? {
        "buy" | "bid" => Some(OrderSide::Buy),
        "sell" | "ask" => Some(OrderSide::Sell),
        _ => None,
    }
}

/// Taker fee for a limit trade, charged in the quote currency
pub fn calculate_fee(market: &Market, amount: Decimal, price: Decimal) -> Fee {
    let rate = market.taker.unwrap_or_default();
    Fee {
        currency: Some(market.symbol.quote.clone()),
        cost: amount.checked_mul(price).and_then(|c| c.checked_mul(rate)),
        rate: Some(rate),
    }
}

pub fn convert_yobit_trade(
    trade: &YobitTrade,
    info: Value,
    index: &MarketIndex,
    market: Option<&Market>,
) -> Trade {
    let timestamp = seconds_to_ms(trade.timestamp);
    let price = trade.rate.or(trade.price);
    let amount = trade.amount;
    let symbol = trade
        .pair
        .as_deref()
        .and_then(|id| index.safe_symbol(id))
        .or_else(|| market.map(|m| m.symbol.clone()));

    let fee = match trade.commission {
        Some(cost) => Some(Fee {
            currency: trade.commission_currency.as_deref().map(currency_code),
            cost: Some(cost),
            rate: None,
        }),
        None if trade.is_your_order.is_some() => {
            let fee_market = symbol
                .as_ref()
                .and_then(|s| index.market(s).ok())
                .or(market);
            match (fee_market, amount, price) {
                (Some(fee_market), Some(amount), Some(price)) => {
                    Some(calculate_fee(fee_market, amount, price))
                }
                _ => None,
            }
        }
        None => None,
    };

    Trade {
        id: trade.trade_id.clone().or_else(|| trade.tid.clone()),
        order: trade.order_id.clone(),
        symbol,
        timestamp,
        datetime: iso8601(timestamp),
        order_type: OrderType::Limit,
        side: parse_side(trade.side.as_deref()),
        taker_or_maker: None,
        price,
        amount,
        cost: price.zip(amount).and_then(|(p, a)| p.checked_mul(a)),
        fee,
        info,
    }
}

pub fn parse_order_status(status: &str) -> OrderStatus {
    match status {
        "0" | "3" => OrderStatus::Open,
        "1" => OrderStatus::Closed,
        "2" => OrderStatus::Canceled,
        other => OrderStatus::Other(other.to_string()),
    }
}

pub fn convert_yobit_order(
    order: &YobitOrder,
    info: Value,
    index: &MarketIndex,
    market: Option<&Market>,
) -> Order {
    let mut id = order.id.clone().or_else(|| order.order_id.clone());
    let mut status = order
        .status
        .as_deref()
        .map_or(OrderStatus::Open, parse_order_status);
    // "0" means the order was matched immediately and never rested on the book
    if id.as_deref() == Some("0") {
        id = order.init_order_id.clone();
        status = OrderStatus::Closed;
    }

    let timestamp = seconds_to_ms(order.timestamp_created.or(order.server_time));
    let symbol = order
        .pair
        .as_deref()
        .and_then(|id| index.safe_symbol(id))
        .or_else(|| market.map(|m| m.symbol.clone()));

    let remaining = order.amount.or(order.remains);
    let filled = order
        .received
        .or_else(|| order.start_amount.zip(remaining).and_then(|(a, r)| a.checked_sub(r)))
        .unwrap_or_default();
    let amount = order
        .start_amount
        .or_else(|| remaining.and_then(|r| filled.checked_add(r)));
    let price = order.rate;

    Order {
        id,
        client_order_id: None,
        symbol,
        timestamp,
        datetime: iso8601(timestamp),
        order_type: OrderType::Limit,
        side: parse_side(order.side.as_deref()),
        price,
        amount,
        filled: Some(filled),
        remaining,
        cost: price.and_then(|p| p.checked_mul(filled)),
        status,
        fee: None,
        info,
    }
}

pub fn convert_yobit_balance(account: &YobitAccountInfo, info: Value) -> Balances {
    let timestamp = seconds_to_ms(account.server_time);
    let empty = serde_json::Map::new();
    let free = account.funds.as_ref().unwrap_or(&empty);
    let total = account.funds_incl_orders.as_ref().unwrap_or(&empty);

    let currency_ids: BTreeSet<&String> = free.keys().chain(total.keys()).collect();
    let mut balances = HashMap::with_capacity(currency_ids.len());
    for currency_id in currency_ids {
        let free = free.get(currency_id).and_then(flex::value_to_decimal);
        let total = total.get(currency_id).and_then(flex::value_to_decimal);
        let used = total.zip(free).and_then(|(t, f)| t.checked_sub(f));
        balances.insert(currency_code(currency_id), Balance { free, used, total });
    }

    Balances {
        timestamp,
        datetime: iso8601(timestamp),
        balances,
        info,
    }
}

/// Amount formatted for an order request, truncated to the market's tick
pub fn amount_to_precision(market: &Market, amount: Decimal) -> Result<String, ExchangeError> {
    let value = match market.precision.amount {
        Some(tick) => amount.round_dp_with_strategy(tick.scale(), RoundingStrategy::ToZero),
        None => amount,
    };
    if value.is_zero() {
        return Err(ExchangeError::InvalidOrder(format!(
            "yobit amount of {} must be greater than minimum amount precision of {}",
            market.symbol,
            market
                .precision
                .amount
                .map_or_else(|| "0".to_string(), |p| p.normalize().to_string())
        )));
    }
    Ok(value.normalize().to_string())
}

/// Price formatted for an order request, rounded half away from zero
pub fn price_to_precision(market: &Market, price: Decimal) -> String {
    let value = match market.precision.price {
        Some(tick) => {
            price.round_dp_with_strategy(tick.scale(), RoundingStrategy::MidpointAwayFromZero)
        }
        None => price,
    };
    value.normalize().to_string()
}

/// Sort by timestamp, keep entries at or after `since`, then cap at `limit`
///
/// Without `since` the most recent `limit` entries are kept.
pub fn filter_by_since_limit<T>(
    mut items: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
    timestamp: impl Fn(&T) -> Option<i64>,
) -> Vec<T> {
    items.sort_by_key(|item| timestamp(item));
    if let Some(since) = since {
        items.retain(|item| timestamp(item).is_some_and(|ts| ts >= since));
    }
    if let Some(limit) = limit.map(|l| l as usize) {
        if items.len() > limit {
            if since.is_some() {
                items.truncate(limit);
            } else {
                items.drain(..items.len() - limit);
            }
        }
    }
    items
}

/// Reject empty or whitespace-containing addresses and single-character repeats
pub fn check_address(address: Option<&str>) -> Result<&str, ExchangeError> {
    let address =
        address.ok_or_else(|| ExchangeError::InvalidAddress("yobit address is undefined".into()))?;
    let mut chars = address.chars();
    let single_repeated = chars
        .next()
        .is_some_and(|first| chars.all(|c| c == first));
    if address.is_empty() || single_repeated || address.chars().any(char::is_whitespace) {
        return Err(ExchangeError::InvalidAddress(format!(
            "yobit address is invalid or has less than 1 characters: \"{}\"",
            address
        )));
    }
    Ok(address)
}
