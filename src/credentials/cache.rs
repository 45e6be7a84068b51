//! Expiry-aware caching for temporary credentials.

use std::future::Future;

use chrono::{TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use super::{CredentialError, ResolvedCredentials};

/// Holds the most recently loaded credentials and reloads them once they come
/// within `refresh_window` of expiring.
///
/// Refreshes are single-flight: callers arriving during a reload wait for it
/// instead of starting their own.
#[derive(Debug)]
pub(crate) struct CredentialsCache {
  refresh_window: TimeDelta,
  cached: Mutex<Option<ResolvedCredentials>>,
}

impl CredentialsCache {
  pub(crate) fn new(refresh_window: TimeDelta) -> Self {
    Self {
      refresh_window,
      cached: Mutex::new(None),
    }
  }

  /// Returns cached credentials, calling `load` when there are none or they
  /// are due for refresh.
  ///
  /// A failed load leaves any previous entry untouched.
  pub(crate) async fn get_or_load<F, Fut>(&self, load: F) -> Result<ResolvedCredentials, CredentialError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<ResolvedCredentials, CredentialError>>,
  {
    let mut cached = self.cached.lock().await;

    if let Some(creds) = cached.as_ref()
      && !self.needs_refresh(creds)
    {
      return Ok(creds.clone());
    }

    debug!("Loading temporary credentials");
    let fresh = ensure_usable(load().await?)?;
    *cached = Some(fresh.clone());
    Ok(fresh)
  }

  fn needs_refresh(&self, creds: &ResolvedCredentials) -> bool {
    match creds.expires_at {
      Some(expiry) => expiry - self.refresh_window <= Utc::now(),
      None => false,
    }
  }
}

/// Rejects credentials with a blank key.
fn ensure_usable(creds: ResolvedCredentials) -> Result<ResolvedCredentials, CredentialError> {
  if creds.access_key.trim().is_empty() {
    return Err(CredentialError::InvalidCredentials("empty access key".to_string()));
  }
  if creds.secret_key.trim().is_empty() {
    return Err(CredentialError::InvalidCredentials("empty secret key".to_string()));
  }
  Ok(creds)
}
