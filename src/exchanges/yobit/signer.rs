use crate::core::kernel::{
    hmac_sha512_hex, NonceGenerator, Params, SignatureResult, SignedPayload, Signer,
};
use secrecy::{ExposeSecret, Secret};
use tracing::trace;

/// Signs trade API calls
///
/// The body is the url-encoded `nonce`, `method` and caller parameters, and the
/// `Sign` header is the hex HMAC-SHA512 of exactly that body.
pub struct YobitSigner {
    api_key: Secret<String>,
    secret_key: Secret<String>,
    nonce: NonceGenerator,
}

impl YobitSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            // the trade API nonce is a 32-bit integer, so seconds rather than ms
            nonce: NonceGenerator::new(),
        }
    }
}

impl std::fmt::Debug for YobitSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YobitSigner")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Signer for YobitSigner {
    fn sign_request(&self, endpoint: &str, params: &Params) -> SignatureResult {
        let nonce = self.nonce.next();
        trace!(nonce, endpoint, "Signing private request");

        let mut payload = Params::new().with("nonce", nonce).with("method", endpoint);
        payload.extend(params.clone());
        let body = payload.urlencode();

        let signature = hmac_sha512_hex(
            self.secret_key.expose_secret().as_bytes(),
            body.as_bytes(),
        )?;

        Ok(SignedPayload {
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("Key".to_string(), self.api_key.expose_secret().clone()),
                ("Sign".to_string(), signature),
            ],
            body,
        })
    }
}
