//! Svix signature generation and verification.
//!
//! The signed content is `"{msg_id}.{timestamp}.{body}"`, HMAC-SHA256 keyed
//! with the base64-decoded secret, and the signature header carries one or
//! more space-separated `v1,<base64 signature>` entries.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{WebhookError, WebhookResult};

type HmacSha256 = Hmac<Sha256>;

/// Prefix of Svix signing secrets.
const SECRET_PREFIX: &str = "whsec_";

/// Signature version tag.
const VERSION_V1: &str = "v1";

/// Webhook signer for generating and verifying Svix signatures.
#[derive(Clone)]
pub struct WebhookSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for WebhookSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSigner").finish_non_exhaustive()
    }
}

impl WebhookSigner {
    /// Creates a signer from a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str) -> WebhookResult<Self> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = STANDARD
            .decode(encoded)
            .map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
        Self::from_key(&key)
    }

    /// Creates a signer from raw key bytes.
    pub fn from_key(key: &[u8]) -> WebhookResult<Self> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Generates the base64 signature for a message.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mac = self.message_mac(msg_id, timestamp, payload);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Keyed MAC over `msg_id.timestamp.payload`, not yet finalized.
    fn message_mac(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }

    /// Generates a full `svix-signature` header value.
    pub fn sign_header(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        format!("{},{}", VERSION_V1, self.sign(msg_id, timestamp, payload))
    }

    /// Verifies a signature header against the message.
    ///
    /// Passes if any `v1` entry matches. `now` is unix seconds.
    pub fn verify_header(
        &self,
        msg_id: &str,
        timestamp: &str,
        header: &str,
        payload: &[u8],
        tolerance_secs: i64,
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp
            .trim()
            .parse::<i64>()
            .map_err(|_| SignatureError::InvalidFormat)?;

        // Check timestamp tolerance; a negative tolerance admits nothing
        let tolerance = u64::try_from(tolerance_secs).unwrap_or(0);
        if now.abs_diff(timestamp) > tolerance {
            return Err(SignatureError::Expired);
        }

        let mut candidates = parse_signature_header(header).peekable();
        if candidates.peek().is_none() {
            return Err(SignatureError::InvalidFormat);
        }

        let mac = self.message_mac(msg_id, timestamp, payload);
        let matches = |signature: &str| {
            STANDARD
                .decode(signature)
                .is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
        };
        if candidates.any(matches) {
            Ok(())
        } else {
            Err(SignatureError::Invalid)
        }
    }
}

/// Signature verification errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Invalid signature format.
    InvalidFormat,
    /// Signature is invalid.
    Invalid,
    /// Signature has expired.
    Expired,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::InvalidFormat => write!(f, "Invalid signature format"),
            SignatureError::Invalid => write!(f, "Invalid signature"),
            SignatureError::Expired => write!(f, "Signature expired"),
        }
    }
}

impl std::error::Error for SignatureError {}

impl From<SignatureError> for WebhookError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InvalidFormat | SignatureError::Invalid => {
                WebhookError::InvalidSignature
            }
            SignatureError::Expired => WebhookError::ExpiredSignature,
        }
    }
}

/// Yields the `v1` signatures of a header, skipping other versions.
fn parse_signature_header(header: &str) -> impl Iterator<Item = &str> {
    header.split_whitespace().filter_map(|entry| {
        let (version, signature) = entry.split_once(',')?;
        (version == VERSION_V1).then_some(signature)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

    #[test]
    fn test_sign_and_verify() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        let payload = b"{\"type\":\"user.created\"}";
        let timestamp = 1_700_000_000;

        let header = signer.sign_header("msg_1", timestamp, payload);
        assert!(header.starts_with("v1,"));
        assert!(
            signer
                .verify_header("msg_1", "1700000000", &header, payload, 300, timestamp)
                .is_ok()
        );

        // Wrong payload should fail
        assert_eq!(
            signer.verify_header("msg_1", "1700000000", &header, b"{}", 300, timestamp),
            Err(SignatureError::Invalid)
        );

        // Wrong message id should fail
        assert_eq!(
            signer.verify_header("msg_2", "1700000000", &header, payload, 300, timestamp),
            Err(SignatureError::Invalid)
        );
    }

    #[test]
    fn test_any_matching_entry_passes() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        let payload = b"body";
        let header = format!("v1,bm90LWl0 v2,abc {}", signer.sign_header("msg", 10, payload));
        assert!(signer.verify_header("msg", "10", &header, payload, 300, 10).is_ok());
    }

    #[test]
    fn test_expired_signature() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        let payload = b"test payload";
        let now = 1_700_000_000;
        let old = now - 600; // 10 minutes ago

        let header = signer.sign_header("msg", old, payload);
        let result = signer.verify_header("msg", &old.to_string(), &header, payload, 300, now);
        assert_eq!(result, Err(SignatureError::Expired));

        // Future timestamps are bounded the same way
        let future = now + 600;
        let header = signer.sign_header("msg", future, payload);
        let result = signer.verify_header("msg", &future.to_string(), &header, payload, 300, now);
        assert_eq!(result, Err(SignatureError::Expired));
    }

    #[test]
    fn test_extreme_timestamps_are_expired() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        let now = 1_700_000_000;
        for timestamp in ["-9223372036854775808", "9223372036854775807"] {
            assert_eq!(
                signer.verify_header("msg", timestamp, "v1,abc", b"{}", 300, now),
                Err(SignatureError::Expired)
            );
        }
        assert_eq!(
            signer.verify_header("msg", "0", "v1,abc", b"{}", i64::MAX, i64::MIN),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn test_undecodable_entries_do_not_match() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        let payload = b"body";
        let valid = signer.sign("msg", 10, payload);
        let truncated = format!("v1,{}", &valid[..valid.len() - 4]);
        for header in ["v1,!!!not-base64!!!", "v1,", truncated.as_str()] {
            assert_eq!(
                signer.verify_header("msg", "10", header, payload, 300, 10),
                Err(SignatureError::Invalid)
            );
        }
    }

    #[test]
    fn test_malformed_header_and_timestamp() {
        let signer = WebhookSigner::new(SECRET).unwrap();
        assert_eq!(
            signer.verify_header("msg", "soon", "v1,abc", b"", 300, 0),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            signer.verify_header("msg", "0", "garbage", b"", 300, 0),
            Err(SignatureError::InvalidFormat)
        );
    }

    #[test]
    fn test_prefix_is_optional() {
        let with_prefix = WebhookSigner::new(SECRET).unwrap();
        let bare = WebhookSigner::new(SECRET.trim_start_matches("whsec_")).unwrap();
        assert_eq!(with_prefix.sign("m", 1, b"x"), bare.sign("m", 1, b"x"));
    }

    #[test]
    fn test_invalid_secret() {
        assert!(matches!(
            WebhookSigner::new("whsec_%%%"),
            Err(WebhookError::InvalidSecret(_))
        ));
    }
}
