//! HMAC-signed upload authorizations.
//!
//! Token = base64url(payload || HMAC-SHA256(secret, payload)) where
//! payload = expiry unix secs (u64 BE) || SHA-256(file bytes) || action
//! bytes. The token is bound to one file digest and one declared
//! action; the orchestrator requests a fresh one per (file,
//! destination) pair, so nothing here is ever cached or reused.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use blobcast_core::{LocalFile, UploadAuthorization};
use blobcast_upload::{Authorizer, UploadError};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const EXPIRY_LEN: usize = 8;
const DIGEST_LEN: usize = 32;
const MAC_LEN: usize = 32;

/// Default authorization lifetime.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Returns the SHA-256 digest of a file's bytes.
pub fn file_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Issues upload authorizations signed with a shared secret.
pub struct HmacAuthorizer {
    secret: Vec<u8>,
    ttl: Duration,
}

impl HmacAuthorizer {
    /// Creates an authorizer with the default token lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_ttl(secret, DEFAULT_TTL)
    }

    /// Creates an authorizer with an explicit token lifetime.
    pub fn with_ttl(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn sign(&self, file: &LocalFile, action: &str) -> String {
        let expiry_ts = SystemTime::now()
            .checked_add(self.ttl)
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.sign_at(file, action, expiry_ts)
    }

    fn sign_at(&self, file: &LocalFile, action: &str, expiry_ts: u64) -> String {
        let digest = file_digest(&file.data);

        let mut payload = Vec::with_capacity(EXPIRY_LEN + DIGEST_LEN + action.len());
        payload.extend_from_slice(&expiry_ts.to_be_bytes());
        payload.extend_from_slice(&digest);
        payload.extend_from_slice(action.as_bytes());

        let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size");
        mac.update(&payload);
        let tag = mac.finalize().into_bytes();

        let mut token_bytes = payload;
        token_bytes.extend_from_slice(&tag);
        URL_SAFE_NO_PAD.encode(token_bytes)
    }
}

impl Authorizer for HmacAuthorizer {
    fn sign_upload<'a>(
        &'a self,
        file: &'a LocalFile,
        action: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadAuthorization, UploadError>> + Send + 'a>> {
        Box::pin(async move { Ok(UploadAuthorization::new(self.sign(file, action))) })
    }
}

/// Verifies a token against the expected file digest and action.
///
/// Returns the embedded expiry timestamp on success. Used by tests and
/// by receiving endpoints that share the secret.
pub fn verify(
    token: &str,
    expected_digest: &[u8],
    action: &str,
    secret: &[u8],
) -> Result<u64, UploadError> {
    let invalid = || UploadError::Authorization("invalid upload token".into());

    let decoded = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
    if decoded.len() < EXPIRY_LEN + DIGEST_LEN + MAC_LEN {
        return Err(invalid());
    }

    let (payload, tag) = decoded.split_at(decoded.len() - MAC_LEN);
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key size");
    mac.update(payload);
    mac.verify_slice(tag).map_err(|_| invalid())?;

    let (expiry_bytes, rest) = payload.split_at(EXPIRY_LEN);
    let (digest, action_bytes) = rest.split_at(DIGEST_LEN);
    if digest != expected_digest || action_bytes != action.as_bytes() {
        return Err(invalid());
    }

    let expiry_ts = u64::from_be_bytes(expiry_bytes.try_into().map_err(|_| invalid())?);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    if expiry_ts < now {
        return Err(UploadError::Authorization("upload token expired".into()));
    }

    Ok(expiry_ts)
}
