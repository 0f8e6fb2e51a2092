use super::YobitShared;
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balances, DepositAddress, Transaction};
use crate::exchanges::yobit::conversions;
use crate::exchanges::yobit::rest::YobitRest;
use crate::exchanges::yobit::types::YobitAccountInfo;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// YoBit account implementation
#[derive(Debug)]
pub struct Account<R: RestClient> {
    shared: Arc<YobitShared<R>>,
}

impl<R: RestClient> Account<R> {
    pub fn new(shared: Arc<YobitShared<R>>) -> Self {
        Self { shared }
    }

    /// Coin id for a currency on a network
    ///
    /// ERC20 is the default network of a coin id; any other network is appended
    /// to it in lower case (`usdt` on TRC20 becomes `usdttrc20`).
    async fn coin_name(&self, code: &str, network: Option<&str>) -> Result<String, ExchangeError> {
        let index = self.shared.market_index().await?;
        let mut coin = index.currency_id(code)?.to_string();
        if let Some(network) = network {
            let network = self.shared.options.resolve_network(network);
            if network != "ERC20" {
                coin.push_str(&network.to_lowercase());
            }
        }
        Ok(coin)
    }

    async fn deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
        need_new: bool,
    ) -> Result<DepositAddress, ExchangeError> {
        let coin = self.coin_name(code, network).await?;
        let response = self.shared.rest.get_deposit_address(&coin, need_new).await?;

        let address = response
            .get("return")
            .and_then(|r| r.get("address"))
            .and_then(Value::as_str);
        let address = conversions::check_address(address)?.to_string();

        Ok(DepositAddress {
            currency: code.to_string(),
            address,
            tag: None,
            network: None,
            info: response,
        })
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_account_balance(&self) -> Result<Balances, ExchangeError> {
        let response = self.shared.rest.get_account_info().await?;
        let account: YobitAccountInfo =
            serde_json::from_value(Value::Object(YobitRest::<R>::return_object(&response)))?;
        Ok(conversions::convert_yobit_balance(&account, response))
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn get_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError> {
        self.deposit_address(code, network, false).await
    }

    #[instrument(skip(self), fields(exchange = "yobit"))]
    async fn create_deposit_address(
        &self,
        code: &str,
        network: Option<&str>,
    ) -> Result<DepositAddress, ExchangeError> {
        self.deposit_address(code, network, true).await
    }

    #[instrument(skip(self, address), fields(exchange = "yobit"))]
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError> {
        conversions::check_address(Some(address))?;
        let index = self.shared.market_index().await?;
        let coin = index.currency_id(code)?;
        if tag.is_some() {
            return Err(ExchangeError::Exchange(
                "yobit withdraw() does not support the tag argument".to_string(),
            ));
        }

        let response = self
            .shared
            .rest
            .withdraw_coins_to_address(coin, &amount.normalize().to_string(), address)
            .await?;

        Ok(Transaction {
            id: None,
            txid: None,
            currency: None,
            amount: None,
            address: None,
            tag: None,
            status: None,
            timestamp: None,
            fee: None,
            info: response,
        })
    }
}
