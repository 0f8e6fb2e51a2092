use super::errors::handle_errors;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    extract_params, implode_params, Params, PreparedRequest, RestClient, Signer,
};
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://yobit.net";
const PUBLIC_API_VERSION: &str = "3";

/// Which API an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSection {
    /// Unauthenticated market data under `/api/3`
    Public,
    /// Signed trade API at `/tapi`
    Private,
}

/// YoBit REST API client
///
/// Builds and signs requests, hands them to the transport and turns the
/// response envelope into either a JSON value or a typed error.
pub struct YobitRest<R: RestClient> {
    rest_client: R,
    signer: Option<Arc<dyn Signer>>,
    /// Held from nonce allocation until the private response arrives, so
    /// signed requests reach the exchange in nonce order
    private_sequence: Mutex<()>,
    public_url: String,
    private_url: String,
}

impl<R: RestClient> std::fmt::Debug for YobitRest<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YobitRest")
            .field("public_url", &self.public_url)
            .field("private_url", &self.private_url)
            .field("authenticated", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: RestClient> YobitRest<R> {
    pub fn new(rest_client: R, base_url: &str, signer: Option<Arc<dyn Signer>>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            rest_client,
            signer,
            private_sequence: Mutex::new(()),
            public_url: format!("{}/api", base_url),
            private_url: format!("{}/tapi", base_url),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    /// Assemble the HTTP request for an endpoint
    ///
    /// Private requests are signed here, so a missing credential fails before
    /// anything reaches the transport.
    pub fn prepare_request(
        &self,
        path: &str,
        api: ApiSection,
        method: Method,
        params: &Params,
    ) -> Result<PreparedRequest, ExchangeError> {
        let query = params.omit(&extract_params(path));

        match api {
            ApiSection::Private => {
                let signer = self.signer.as_ref().ok_or_else(|| {
                    ExchangeError::AuthError(
                        "yobit requires \"apiKey\" and \"secret\" credentials".to_string(),
                    )
                })?;
                let payload = signer.sign_request(path, &query)?;
                Ok(PreparedRequest {
                    method,
                    url: self.private_url.clone(),
                    headers: payload.headers,
                    body: Some(payload.body),
                })
            }
            ApiSection::Public => {
                let mut url = format!(
                    "{}/{}/{}",
                    self.public_url,
                    PUBLIC_API_VERSION,
                    implode_params(path, params)
                );
                let mut headers = Vec::new();
                let mut body = None;
                if !query.is_empty() {
                    if method == Method::GET {
                        url.push('?');
                        url.push_str(&query.urlencode());
                    } else {
                        headers.push((
                            "Content-Type".to_string(),
                            "application/json".to_string(),
                        ));
                        body = Some(query.to_json().to_string());
                    }
                }
                Ok(PreparedRequest {
                    method,
                    url,
                    headers,
                    body,
                })
            }
        }
    }

    #[instrument(skip(self, params), fields(exchange = "yobit", endpoint = %path))]
    async fn request(
        &self,
        path: &str,
        api: ApiSection,
        method: Method,
        params: Params,
    ) -> Result<Value, ExchangeError> {
        let sequence = match api {
            ApiSection::Private => Some(self.private_sequence.lock().await),
            ApiSection::Public => None,
        };
        let request = self.prepare_request(path, api, method, &params)?;
        let response = self.rest_client.execute(request).await?;
        drop(sequence);

        let value: Value = match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(_) if !response.is_success() => {
                return Err(ExchangeError::from_http_status(
                    response.status,
                    response.body,
                ));
            }
            Err(e) => {
                return Err(ExchangeError::DeserializationError(format!(
                    "Failed to parse YoBit response: {}",
                    e
                )));
            }
        };

        handle_errors(&response.body, &value)?;
        if !response.is_success() {
            return Err(ExchangeError::from_http_status(
                response.status,
                response.body,
            ));
        }

        debug!(status = response.status, "YoBit request succeeded");
        Ok(value)
    }

    async fn public_get(&self, path: &str, params: Params) -> Result<Value, ExchangeError> {
        self.request(path, ApiSection::Public, Method::GET, params)
            .await
    }

    async fn private_post(&self, path: &str, params: Params) -> Result<Value, ExchangeError> {
        self.request(path, ApiSection::Private, Method::POST, params)
            .await
    }

    /// `return` object of a private response, empty when absent
    pub fn return_object(response: &Value) -> Map<String, Value> {
        response
            .get("return")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Exchange info: server time and every pair's limits and fees
    pub async fn get_info(&self) -> Result<Value, ExchangeError> {
        self.public_get("info", Params::new()).await
    }

    /// Tickers for `-`-joined market ids, keyed by market id
    pub async fn get_tickers(&self, pair_ids: &str) -> Result<Value, ExchangeError> {
        self.public_get("ticker/{pair}", Params::new().with("pair", pair_ids))
            .await
    }

    /// Order books for `-`-joined market ids, keyed by market id
    pub async fn get_depth(&self, pair_ids: &str, limit: Option<u32>) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("pair", pair_ids)
            .with_opt("limit", limit);
        self.public_get("depth/{pair}", params).await
    }

    pub async fn get_trades(&self, pair_id: &str, limit: Option<u32>) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("pair", pair_id)
            .with_opt("limit", limit);
        self.public_get("trades/{pair}", params).await
    }

    /// Account funds and rights
    pub async fn get_account_info(&self) -> Result<Value, ExchangeError> {
        self.private_post("getInfo", Params::new()).await
    }

    pub async fn trade(
        &self,
        pair_id: &str,
        side: &str,
        amount: &str,
        rate: &str,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("pair", pair_id)
            .with("type", side)
            .with("amount", amount)
            .with("rate", rate);
        self.private_post("Trade", params).await
    }

    pub async fn cancel_order(&self, order_id: u64) -> Result<Value, ExchangeError> {
        self.private_post("CancelOrder", Params::new().with("order_id", order_id))
            .await
    }

    pub async fn order_info(&self, order_id: u64) -> Result<Value, ExchangeError> {
        self.private_post("OrderInfo", Params::new().with("order_id", order_id))
            .await
    }

    pub async fn active_orders(&self, pair_id: &str) -> Result<Value, ExchangeError> {
        self.private_post("ActiveOrders", Params::new().with("pair", pair_id))
            .await
    }

    /// Own trades; `since` is in seconds
    pub async fn trade_history(
        &self,
        pair_id: &str,
        count: Option<u32>,
        since: Option<i64>,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("pair", pair_id)
            .with_opt("count", count)
            .with_opt("since", since);
        self.private_post("TradeHistory", params).await
    }

    pub async fn get_deposit_address(
        &self,
        coin_name: &str,
        need_new: bool,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("coinName", coin_name)
            .with("need_new", u8::from(need_new));
        self.private_post("GetDepositAddress", params).await
    }

    pub async fn withdraw_coins_to_address(
        &self,
        coin_name: &str,
        amount: &str,
        address: &str,
    ) -> Result<Value, ExchangeError> {
        let params = Params::new()
            .with("coinName", coin_name)
            .with("amount", amount)
            .with("address", address);
        self.private_post("WithdrawCoinsToAddress", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::{hmac_sha512_hex, RestResponse};
    use crate::exchanges::yobit::signer::YobitSigner;
    use async_trait::async_trait;

    struct NoNetwork;

    #[async_trait]
    impl RestClient for NoNetwork {
        async fn execute(&self, _request: PreparedRequest) -> Result<RestResponse, ExchangeError> {
            Err(ExchangeError::NetworkError("no network in unit tests".into()))
        }
    }

    fn authenticated() -> YobitRest<NoNetwork> {
        let signer: Arc<dyn Signer> =
            Arc::new(YobitSigner::new("key".to_string(), "secret".to_string()));
        YobitRest::new(NoNetwork, DEFAULT_BASE_URL, Some(signer))
    }

    #[test]
    fn test_public_get_substitutes_path_and_appends_query() {
        let rest = YobitRest::new(NoNetwork, DEFAULT_BASE_URL, None);
        let params = Params::new().with("pair", "ltc_btc-eth_btc").with("limit", 50);
        let request = rest
            .prepare_request("depth/{pair}", ApiSection::Public, Method::GET, &params)
            .unwrap();
        assert_eq!(
            request.url,
            "https://yobit.net/api/3/depth/ltc_btc-eth_btc?limit=50"
        );
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_public_non_get_sends_json_body() {
        let rest = YobitRest::new(NoNetwork, DEFAULT_BASE_URL, None);
        let params = Params::new().with("pair", "ltc_btc").with("limit", 5);
        let request = rest
            .prepare_request("depth/{pair}", ApiSection::Public, Method::POST, &params)
            .unwrap();
        assert_eq!(request.url, "https://yobit.net/api/3/depth/ltc_btc");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"limit": "5"}));
    }

    #[test]
    fn test_private_request_is_signed_form() {
        let rest = authenticated();
        let params = Params::new().with("pair", "ltc_btc");
        let request = rest
            .prepare_request("ActiveOrders", ApiSection::Private, Method::POST, &params)
            .unwrap();
        assert_eq!(request.url, "https://yobit.net/tapi");
        let body = request.body.clone().unwrap();
        assert!(body.starts_with("nonce="));
        assert!(body.ends_with("&method=ActiveOrders&pair=ltc_btc"));
        assert_eq!(
            request.header("Sign").unwrap(),
            hmac_sha512_hex(b"secret", body.as_bytes()).unwrap()
        );
        assert_eq!(request.header("Key"), Some("key"));
    }

    #[test]
    fn test_private_without_credentials_fails_early() {
        let rest = YobitRest::new(NoNetwork, DEFAULT_BASE_URL, None);
        let err = rest
            .prepare_request("getInfo", ApiSection::Private, Method::POST, &Params::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
    }

    #[test]
    fn test_base_url_override() {
        let rest = YobitRest::new(NoNetwork, "https://yobit.io/", None);
        let request = rest
            .prepare_request("info", ApiSection::Public, Method::GET, &Params::new())
            .unwrap();
        assert_eq!(request.url, "https://yobit.io/api/3/info");
    }
}
