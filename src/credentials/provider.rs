//! Credential provider abstractions.
//!
//! Defines the [`CredentialsProvider`] trait so the static, session-token, and
//! instance-profile sources (and test doubles) can sit in the same chain
//! without the chain knowing how any of them obtains credentials.

use async_trait::async_trait;

use super::{CredentialError, ResolvedCredentials};
use crate::config::SourceKind;

/// A source of credentials.
///
/// Implementations must be safe to call from many tasks at once; any caching
/// or refresh state is the implementation's own responsibility.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
  /// The kind of source this provider represents, used for diagnostics.
  fn kind(&self) -> SourceKind;

  /// Produces credentials.
  ///
  /// # Errors
  /// Returns a [`CredentialError`] when this source cannot supply usable
  /// credentials right now. Callers treat that as "try the next source".
  async fn provide_credentials(&self) -> Result<ResolvedCredentials, CredentialError>;
}
