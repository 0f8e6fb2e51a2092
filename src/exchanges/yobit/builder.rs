use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, Signer};
use crate::exchanges::yobit::{connector::YobitConnector, rest::DEFAULT_BASE_URL, signer::YobitSigner};
use crate::utils::batch::{UrlBudget, DEFAULT_MAX_URL_LENGTH, DEFAULT_RESERVED_URL_LENGTH};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Connector options that shape request construction
#[derive(Debug, Clone)]
pub struct YobitOptions {
    /// Longest URL the exchange accepts
    pub max_url_length: usize,
    /// Part of the URL budget set aside for base URL and endpoint path
    pub reserved_url_length: usize,
    /// Network aliases accepted for deposit addresses, e.g. `ETH` for `ERC20`
    pub networks: HashMap<String, String>,
}

impl YobitOptions {
    pub fn url_budget(&self) -> UrlBudget {
        UrlBudget::new(self.max_url_length, self.reserved_url_length)
    }

    /// Canonical network name for a user-supplied network or alias
    pub fn resolve_network(&self, network: &str) -> String {
        let upper = network.to_uppercase();
        self.networks.get(&upper).cloned().unwrap_or(upper)
    }
}

impl Default for YobitOptions {
    fn default() -> Self {
        let networks = [("ETH", "ERC20"), ("TRX", "TRC20"), ("BSC", "BEP20")]
            .into_iter()
            .map(|(alias, network)| (alias.to_string(), network.to_string()))
            .collect();
        Self {
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            reserved_url_length: DEFAULT_RESERVED_URL_LENGTH,
            networks,
        }
    }
}

/// Builder for creating YoBit exchange connectors
pub struct YobitBuilder {
    config: ExchangeConfig,
    options: YobitOptions,
    rest_timeout: u64,
    rest_max_retries: u32,
    rate_limit: Option<Duration>,
}

impl Default for YobitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl YobitBuilder {
    /// Create a new `YobitBuilder` with default settings
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            options: YobitOptions::default(),
            rest_timeout: 30,
            rest_max_retries: 3,
            // public data is cached server-side for 2 seconds
            rate_limit: Some(Duration::from_millis(2000)),
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials, keeping any base URL override
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let base_url = self.config.base_url.clone();
        self.config = ExchangeConfig::new(api_key, secret_key);
        if let Some(base_url) = base_url {
            self.config = self.config.base_url(base_url);
        }
        self
    }

    /// Set base URL for REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    pub fn with_max_url_length(mut self, max_url_length: usize) -> Self {
        self.options.max_url_length = max_url_length;
        self
    }

    pub fn with_reserved_url_length(mut self, reserved: usize) -> Self {
        self.options.reserved_url_length = reserved;
        self
    }

    /// Add or replace a deposit network alias
    pub fn with_network_alias(mut self, alias: &str, network: &str) -> Self {
        self.options
            .networks
            .insert(alias.to_uppercase(), network.to_uppercase());
        self
    }

    /// Set REST client timeout
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    /// Set REST client maximum retries
    pub fn with_rest_max_retries(mut self, retries: u32) -> Self {
        self.rest_max_retries = retries;
        self
    }

    /// Minimum spacing between requests; `None` disables throttling
    pub fn with_rate_limit(mut self, interval: Option<Duration>) -> Self {
        self.rate_limit = interval;
        self
    }

    pub fn options(&self) -> &YobitOptions {
        &self.options
    }

    fn base_url(&self) -> String {
        self.config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.config.has_credentials().then(|| {
            Arc::new(YobitSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            )) as Arc<dyn Signer>
        })
    }

    /// Build a connector backed by the reqwest transport
    pub fn build(self) -> Result<YobitConnector<ReqwestRest>, ExchangeError> {
        let rest_config = RestClientConfig::new("yobit".to_string())
            .with_timeout(self.rest_timeout)
            .with_max_retries(self.rest_max_retries)
            .with_rate_limit(self.rate_limit);
        let rest = RestClientBuilder::new(rest_config).build()?;
        Ok(self.build_with_rest(rest))
    }

    /// Build a connector on top of a caller-supplied transport
    pub fn build_with_rest<R: RestClient>(self, rest: R) -> YobitConnector<R> {
        let base_url = self.base_url();
        let signer = self.signer();
        YobitConnector::new(rest, &base_url, signer, self.options)
    }
}

/// Build a YoBit connector from configuration
pub fn build_connector(config: ExchangeConfig) -> Result<YobitConnector<ReqwestRest>, ExchangeError> {
    YobitBuilder::new().with_config(config).build()
}
