use crate::core::errors::ExchangeError;
use crate::core::kernel::params::Params;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha512 = Hmac<Sha512>;

/// Headers and body of an authenticated request
///
/// `body` is the exact byte sequence the signature was computed over and must be
/// transmitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub type SignatureResult = Result<SignedPayload, ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations own the credentials and every piece of per-request state
/// (nonces) needed to authenticate a private call.
pub trait Signer: Send + Sync {
    /// Sign a private request
    ///
    /// # Arguments
    /// * `endpoint` - Exchange method name of the private endpoint
    /// * `params` - Caller parameters to include in the signed body
    fn sign_request(&self, endpoint: &str, params: &Params) -> SignatureResult;
}

/// Hex-encoded HMAC-SHA512 of `payload` keyed with `secret`
pub fn hmac_sha512_hex(secret: &[u8], payload: &[u8]) -> Result<String, ExchangeError> {
    let mut mac = HmacSha512::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Strictly increasing nonce source shared by every request of one credential
///
/// Values follow the wall clock in seconds but never repeat or decrease: when two
/// allocations land on the same second the second one gets `previous + 1`.
/// Allocation is a single atomic read-modify-write, so concurrent callers are
/// serialized without a lock.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// Allocate the next nonce
    pub fn next(&self) -> u64 {
        let now = Self::clock();
        let previous = match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => prev,
        };
        now.max(previous + 1)
    }
}
