//! Slack request signature verification.
//!
//! Slack signs every webhook with HMAC-SHA256 over the version-prefixed
//! basestring `v0:{timestamp}:{body}` and sends the result as
//! `x-slack-signature: v0=<hex>`. Verification only borrows the body, so the
//! same bytes are handed to the classifier afterwards.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::receiver::WebhookRequest;
use crate::auth::SigningSecret;
use crate::error::VerificationError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the `v0=<hex>` signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the Unix timestamp included in the signed basestring.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

const SIGNATURE_VERSION: &str = "v0";

/// Verifies Slack webhook signatures.
///
/// A replay window is disabled unless [`SignatureVerifier::with_max_age`] is
/// used; without one, any timestamp string is accepted as long as the
/// signature over it matches.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::auth::SigningSecret;
/// use slack_bot_sdk::webhook::SignatureVerifier;
///
/// let verifier = SignatureVerifier::new(SigningSecret::new("secret").unwrap());
/// let body = b"command=%2Fstart";
/// let signature = verifier.sign("1531420618", body).unwrap();
///
/// assert!(verifier
///     .verify(Some("1531420618"), body, Some(&signature))
///     .is_ok());
/// assert!(verifier.verify(None, body, Some(&signature)).is_err());
/// ```
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: SigningSecret,
    max_age: Option<Duration>,
}

impl SignatureVerifier {
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            max_age: None,
        }
    }

    /// Reject requests whose timestamp is further than `max_age` from now.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Verify the signature headers of a webhook request.
    pub fn verify_request(&self, request: &WebhookRequest) -> Result<(), VerificationError> {
        self.verify(
            request.header(TIMESTAMP_HEADER),
            request.payload(),
            request.header(SIGNATURE_HEADER),
        )
    }

    /// Verify a signature against the timestamp and raw body.
    ///
    /// Missing or empty headers fail before any HMAC is computed.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<(), VerificationError> {
        self.verify_at(timestamp, body, signature, Utc::now())
    }

    fn verify_at(
        &self,
        timestamp: Option<&str>,
        body: &[u8],
        signature: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let timestamp = timestamp
            .filter(|t| !t.is_empty())
            .ok_or(VerificationError::MissingTimestamp)?;
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or(VerificationError::MissingSignature)?;

        if let Some(max_age) = self.max_age {
            check_freshness(timestamp, max_age, now)?;
        }

        let expected = self.sign(timestamp, body)?;
        if constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
            Ok(())
        } else {
            Err(VerificationError::SignatureMismatch)
        }
    }

    /// Compute the `v0=<hex>` signature Slack would send for this request.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, VerificationError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_bytes()).map_err(|e| {
            VerificationError::HmacError {
                message: e.to_string(),
            }
        })?;
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);

        Ok(format!(
            "{}={}",
            SIGNATURE_VERSION,
            hex::encode(mac.finalize().into_bytes())
        ))
    }
}

fn check_freshness(
    timestamp: &str,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<(), VerificationError> {
    let seconds: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| VerificationError::InvalidTimestamp {
            value: timestamp.to_string(),
        })?;

    let age_seconds = now.timestamp().saturating_sub(seconds);
    if age_seconds.unsigned_abs() > max_age.num_seconds().unsigned_abs() {
        return Err(VerificationError::StaleTimestamp { age_seconds });
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    // Length is not secret.
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<REDACTED>")
            .field("max_age", &self.max_age)
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
