//! HMAC-SHA256 signatures binding a media key to a timestamp.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::WorkerSecret;

type HmacSha256 = Hmac<Sha256>;

/// Compute the lowercase hex HMAC-SHA256 of `"{key}\n{timestamp}"` keyed by `secret`.
pub fn sign(key: &str, timestamp: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(key.as_bytes());
    mac.update(b"\n");
    mac.update(timestamp.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Timestamp and signature presented to the backend for one presign call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCredentials {
    /// Seconds since the Unix epoch, decimal encoded.
    pub timestamp: String,
    /// Lowercase hex HMAC-SHA256.
    pub signature: String,
}

/// Signs media keys with the configured worker secret.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    secret: WorkerSecret,
}

impl RequestSigner {
    pub fn new(secret: WorkerSecret) -> Self {
        Self { secret }
    }

    /// Credentials for `key` at the given instant.
    pub fn credentials_at(&self, key: &str, now: SystemTime) -> WorkerCredentials {
        let timestamp = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let signature = sign(key, &timestamp, self.secret.expose());

        WorkerCredentials {
            timestamp,
            signature,
        }
    }

    /// Credentials for `key` at the current wall-clock time.
    pub fn credentials(&self, key: &str) -> WorkerCredentials {
        self.credentials_at(key, SystemTime::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sign_known_vector() {
        assert_eq!(
            sign("abc.mp4", "1700000000", "secret"),
            "0ad008dd46d1f3dc8eaad67a3872fecee49bc4e260055878b22db560232ac93b"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign("videos/a.mp4", "1700000000", "s3cr3t");
        let b = sign("videos/a.mp4", "1700000000", "s3cr3t");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_is_sensitive_to_every_input() {
        let base = sign("a.mp4", "1700000000", "secret");
        assert_ne!(base, sign("b.mp4", "1700000000", "secret"));
        assert_ne!(base, sign("a.mp4", "1700000001", "secret"));
        assert_ne!(base, sign("a.mp4", "1700000000", "secret2"));
    }

    #[test]
    fn test_separator_is_part_of_message() {
        // "ab" + "\n" + "c" must not collide with "a" + "\n" + "bc".
        assert_ne!(sign("ab", "c", "k"), sign("a", "bc", "k"));
    }

    #[test]
    fn test_credentials_use_epoch_seconds() {
        let signer = RequestSigner::new(WorkerSecret::new("secret"));
        let now = UNIX_EPOCH + Duration::from_millis(1_700_000_000_999);
        let creds = signer.credentials_at("a.mp4", now);

        assert_eq!(creds.timestamp, "1700000000");
        assert_eq!(creds.signature, sign("a.mp4", "1700000000", "secret"));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let signer = RequestSigner::new(WorkerSecret::new("super-secret-value"));
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains("super-secret-value"));
    }
}
