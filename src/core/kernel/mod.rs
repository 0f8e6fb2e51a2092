/// Kernel - exchange-agnostic transport layer
///
/// The kernel holds only transport and authentication plumbing. Nothing in here
/// knows about a particular exchange's endpoints or payloads.
///
/// # Components
///
/// - `RestClient`: HTTP transport interface, implemented by `ReqwestRest`
/// - `Signer`: pluggable request authentication
/// - `NonceGenerator`: strictly increasing nonce source for signers
/// - `Params`: ordered request parameters and URL helpers
///
/// # Example
/// ```rust,no_run
/// use yobitx::core::kernel::*;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), yobitx::core::errors::ExchangeError> {
/// let rest = RestClientBuilder::new(
///     RestClientConfig::new("yobit".to_string())
///         .with_timeout(10)
///         .with_rate_limit(Some(Duration::from_millis(2000))),
/// )
/// .build()?;
/// # let _ = rest;
/// # Ok(())
/// # }
/// ```
pub mod params;
pub mod rest;
pub mod signer;

pub use params::{extract_params, implode_params, Params};
pub use rest::{
    PreparedRequest, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, RestResponse,
};
pub use signer::{
    hmac_sha512_hex, NonceGenerator, SignatureResult, SignedPayload, Signer,
};
