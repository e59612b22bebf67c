//! Slack app secrets and workspace credential resolution.
//!
//! This module provides:
//! - [`SigningSecret`] - the pre-shared HMAC key used to verify inbound webhooks
//! - [`BotToken`] - a workspace's bot credential for outbound API calls
//! - [`TeamId`] - the workspace identifier a credential is resolved for
//! - [`CredentialResolver`] - the injected capability that maps workspaces to tokens
//!
//! Secret material is zeroed when dropped and never appears in `Debug` output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CredentialError, SecretError};

// ============================================================================
// Identifiers
// ============================================================================

/// Slack workspace (team) identifier, e.g. `T0123456`.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::auth::TeamId;
///
/// let team = TeamId::new("T0123456");
/// assert_eq!(team.as_str(), "T0123456");
/// assert_eq!(team.to_string(), "T0123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(String);

impl TeamId {
    /// Create a new team identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Secrets
// ============================================================================

/// Webhook signing secret shared with Slack.
///
/// Immutable once constructed. Used only as the HMAC-SHA256 key when verifying
/// inbound request signatures.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::auth::SigningSecret;
///
/// let secret = SigningSecret::new("8f742231b10e8888abcd99yyyzzz85a5").unwrap();
/// assert!(!format!("{:?}", secret).contains("8f742231"));
///
/// assert!(SigningSecret::new("").is_err());
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Create a signing secret, rejecting empty values.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = secret.into();
        if bytes.is_empty() {
            return Err(SecretError::Empty {
                key: "signing_secret".to_string(),
            });
        }
        Ok(Self(bytes))
    }

    /// Raw key bytes, for HMAC computation only.
    pub fn expose_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<REDACTED>").finish()
    }
}

/// Bot user OAuth token for a single workspace (`xoxb-...`).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BotToken(String);

impl BotToken {
    /// Create a bot token, rejecting empty values.
    pub fn new(token: impl Into<String>) -> Result<Self, SecretError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SecretError::Empty {
                key: "bot_token".to_string(),
            });
        }
        if token.chars().any(char::is_whitespace) {
            return Err(SecretError::InvalidFormat {
                key: "bot_token".to_string(),
            });
        }
        Ok(Self(token))
    }

    /// Token string for the `Authorization: Bearer` header.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BotToken").field(&"<REDACTED>").finish()
    }
}

// ============================================================================
// Credential Resolution
// ============================================================================

/// Resolves the bot credential for the workspace a request came from.
///
/// A failure surfaces to Slack as HTTP 500 and the handler is never invoked.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Get the bot token for a workspace.
    async fn resolve(&self, team_id: &TeamId) -> Result<BotToken, CredentialError>;
}

/// Resolver for a non-distributed app: every workspace gets the same token.
#[derive(Debug, Clone)]
pub struct StaticCredentialResolver {
    token: BotToken,
}

impl StaticCredentialResolver {
    pub fn new(token: BotToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(&self, _team_id: &TeamId) -> Result<BotToken, CredentialError> {
        Ok(self.token.clone())
    }
}

/// In-memory resolver for apps installed into a known set of workspaces.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::auth::{BotToken, TeamId, WorkspaceCredentialResolver};
///
/// let resolver = WorkspaceCredentialResolver::new()
///     .with_workspace(TeamId::new("T1"), BotToken::new("xoxb-1").unwrap());
/// assert!(resolver.contains(&TeamId::new("T1")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorkspaceCredentialResolver {
    tokens: HashMap<TeamId, BotToken>,
}

impl WorkspaceCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the token for a workspace.
    pub fn with_workspace(mut self, team_id: TeamId, token: BotToken) -> Self {
        self.tokens.insert(team_id, token);
        self
    }

    /// Check whether a workspace has a token.
    pub fn contains(&self, team_id: &TeamId) -> bool {
        self.tokens.contains_key(team_id)
    }
}

#[async_trait]
impl CredentialResolver for WorkspaceCredentialResolver {
    async fn resolve(&self, team_id: &TeamId) -> Result<BotToken, CredentialError> {
        self.tokens
            .get(team_id)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound {
                team_id: team_id.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
