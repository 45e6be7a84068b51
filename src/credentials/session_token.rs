//! Temporary credentials from a security token service.
//!
//! The provider exchanges a long-lived key pair for short-lived session
//! credentials and caches the result until shortly before it expires. The
//! exchange itself is delegated to a [`SessionTokenService`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;

use super::cache::CredentialsCache;
use super::{BaseCredentials, CredentialError, CredentialsProvider, ResolvedCredentials};
use crate::config::SourceKind;

/// Session length requested from the token service.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(3600);

/// How long before expiry cached session credentials are replaced.
pub const SESSION_REFRESH_WINDOW: TimeDelta = TimeDelta::seconds(60);

/// A service that issues temporary session credentials for a key pair.
#[async_trait]
pub trait SessionTokenService: Send + Sync {
  /// Exchanges `base` for session credentials valid for roughly `duration`.
  ///
  /// # Errors
  /// Returns a [`CredentialError`] when the service rejects the key pair or
  /// cannot be reached.
  async fn get_session_token(
    &self,
    base: &BaseCredentials,
    duration: Duration,
  ) -> Result<ResolvedCredentials, CredentialError>;
}

/// Provides session credentials derived from a configured key pair.
pub struct SessionTokenCredentialsProvider {
  base: BaseCredentials,
  service: Arc<dyn SessionTokenService>,
  session_duration: Duration,
  cache: CredentialsCache,
}

impl SessionTokenCredentialsProvider {
  /// Creates a provider that requests sessions of [`DEFAULT_SESSION_DURATION`].
  pub fn new(base: BaseCredentials, service: Arc<dyn SessionTokenService>) -> Self {
    Self {
      base,
      service,
      session_duration: DEFAULT_SESSION_DURATION,
      cache: CredentialsCache::new(SESSION_REFRESH_WINDOW),
    }
  }

  /// Overrides the requested session length.
  pub fn with_session_duration(mut self, duration: Duration) -> Self {
    self.session_duration = duration;
    self
  }

  /// The key pair exchanged for sessions.
  pub fn base_credentials(&self) -> &BaseCredentials {
    &self.base
  }
}

#[async_trait]
impl CredentialsProvider for SessionTokenCredentialsProvider {
  fn kind(&self) -> SourceKind {
    SourceKind::SecurityTokenCredentials
  }

  async fn provide_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    self
      .cache
      .get_or_load(|| self.service.get_session_token(&self.base, self.session_duration))
      .await
  }
}
