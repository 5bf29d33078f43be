//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use hookline_protocols::error::TriggerDispatchError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `sha256=<hex digest>` of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hookline-signature";

const SCHEME_PREFIX: &str = "sha256=";

/// Compute the header value for `body`.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = mac_for(secret);
    mac.update(body);
    format!("{SCHEME_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signature header value against `body` in constant time.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), TriggerDispatchError> {
    let digest = header
        .map(str::trim)
        .and_then(|h| h.strip_prefix(SCHEME_PREFIX))
        .and_then(|h| hex::decode(h).ok())
        .ok_or(TriggerDispatchError::SignatureMismatch)?;

    let mut mac = mac_for(secret);
    mac.update(body);
    mac.verify_slice(&digest)
        .map_err(|_| TriggerDispatchError::SignatureMismatch)
}

fn mac_for(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length.
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac accepts any key length"),
    }
}
