#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use yobitx::core::errors::ExchangeError;
use yobitx::core::kernel::{PreparedRequest, RestClient, RestResponse};
use yobitx::exchanges::yobit::{YobitBuilder, YobitConnector};

type Responder = Box<dyn Fn(&PreparedRequest) -> RestResponse + Send + Sync>;
type Latency = Box<dyn Fn(usize) -> Duration + Send + Sync>;

enum Matcher {
    /// Public GET whose URL contains the pattern
    Public(String),
    /// Private POST whose body carries `method=<name>`
    Private(String),
}

struct Route {
    matcher: Matcher,
    responder: Responder,
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<PreparedRequest>,
    latency: Option<Latency>,
}

/// In-memory transport that records every request and serves canned responses
///
/// Requests are recorded in arrival order, after any configured latency.
#[derive(Clone, Default)]
pub struct MockRest {
    state: Arc<Mutex<MockState>>,
    entered: Arc<AtomicUsize>,
}

pub fn ok(body: &Value) -> RestResponse {
    RestResponse {
        status: 200,
        body: body.to_string(),
    }
}

/// Decoded `application/x-www-form-urlencoded` body
pub fn form(body: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

pub fn form_value(body: &str, key: &str) -> Option<String> {
    form(body).into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Market ids joined in a public URL path segment, e.g. `ticker/a_b-c_d?limit=1`
pub fn path_ids(url: &str, endpoint: &str) -> Vec<String> {
    let marker = format!("/api/3/{}/", endpoint);
    url.split_once(&marker)
        .map(|(_, rest)| rest.split('?').next().unwrap_or_default())
        .map(|ids| ids.split('-').map(str::to_string).collect())
        .unwrap_or_default()
}

impl MockRest {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(self, matcher: Matcher, responder: Responder) -> Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .push(Route { matcher, responder });
        self
    }

    pub fn on_public(self, pattern: &str, body: Value) -> Self {
        self.route(
            Matcher::Public(pattern.to_string()),
            Box::new(move |_| ok(&body)),
        )
    }

    pub fn on_public_with<F>(self, pattern: &str, responder: F) -> Self
    where
        F: Fn(&PreparedRequest) -> RestResponse + Send + Sync + 'static,
    {
        self.route(Matcher::Public(pattern.to_string()), Box::new(responder))
    }

    pub fn on_private(self, method: &str, body: Value) -> Self {
        self.route(
            Matcher::Private(method.to_string()),
            Box::new(move |_| ok(&body)),
        )
    }

    /// Delay each request by `latency(n)`, where `n` counts calls entering the transport
    pub fn with_latency<F>(self, latency: F) -> Self
    where
        F: Fn(usize) -> Duration + Send + Sync + 'static,
    {
        self.state.lock().unwrap().latency = Some(Box::new(latency));
        self
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn private_requests(&self) -> Vec<PreparedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with("/tapi"))
            .collect()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.contains(pattern))
            .count()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn execute(&self, request: PreparedRequest) -> Result<RestResponse, ExchangeError> {
        let ticket = self.entered.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .state
            .lock()
            .unwrap()
            .latency
            .as_ref()
            .map(|latency| latency(ticket));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let private_method = request
            .body
            .as_deref()
            .and_then(|body| form_value(body, "method"));

        let route = state.routes.iter().find(|route| match &route.matcher {
            Matcher::Public(pattern) => {
                request.method == Method::GET && request.url.contains(pattern.as_str())
            }
            Matcher::Private(method) => private_method.as_deref() == Some(method.as_str()),
        });

        match route {
            Some(route) => Ok((route.responder)(&request)),
            None => Err(ExchangeError::NetworkError(format!(
                "no mock route for {} {}",
                request.method, request.url
            ))),
        }
    }
}

pub fn pair_info(decimal_places: u32) -> Value {
    json!({
        "decimal_places": decimal_places,
        "min_price": 0.00000001,
        "max_price": 10000,
        "min_amount": 0.0001,
        "min_total": 0.0001,
        "hidden": 0,
        "fee": 0.2,
        "fee_buyer": 0.2,
        "fee_seller": 0.2
    })
}

/// `info` response listing the given market ids
pub fn info_response(ids: &[&str]) -> Value {
    let pairs: serde_json::Map<String, Value> = ids
        .iter()
        .map(|id| (id.to_string(), pair_info(8)))
        .collect();
    json!({"server_time": 1_615_856_752, "pairs": pairs})
}

pub fn default_info() -> Value {
    info_response(&["ltc_btc", "eth_btc", "dsh_btc", "usdt_rur", "doge_usdt"])
}

pub fn ticker_body(last: f64) -> Value {
    json!({
        "high": last * 1.1,
        "low": last * 0.9,
        "avg": last,
        "vol": 120.5,
        "vol_cur": 3572.25,
        "last": last,
        "buy": last * 0.99,
        "sell": last * 1.01,
        "updated": 1_537_522_009
    })
}

/// Ticker responder that answers for exactly the ids in the request path
pub fn echo_tickers(request: &PreparedRequest) -> RestResponse {
    let tickers: serde_json::Map<String, Value> = path_ids(&request.url, "ticker")
        .into_iter()
        .map(|id| (id, ticker_body(0.5)))
        .collect();
    ok(&Value::Object(tickers))
}

pub fn public_connector(mock: &MockRest) -> YobitConnector<MockRest> {
    YobitBuilder::new().build_with_rest(mock.clone())
}

pub fn private_connector(mock: &MockRest) -> YobitConnector<MockRest> {
    YobitBuilder::new()
        .with_credentials("test-key".to_string(), "test-secret".to_string())
        .build_with_rest(mock.clone())
}
