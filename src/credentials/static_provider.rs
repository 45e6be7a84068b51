//! Provider for fixed key pairs.

use async_trait::async_trait;

use super::{BaseCredentials, CredentialError, CredentialsProvider, ResolvedCredentials};
use crate::config::SourceKind;

/// Returns the same key pair on every call without performing any I/O.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
  credentials: BaseCredentials,
}

impl StaticCredentialsProvider {
  /// Creates a provider for the given key pair.
  pub fn new(credentials: BaseCredentials) -> Self {
    Self { credentials }
  }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
  fn kind(&self) -> SourceKind {
    SourceKind::SimpleCredentials
  }

  async fn provide_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    Ok(ResolvedCredentials::from(&self.credentials))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_static_provider_returns_keys() {
    let provider = StaticCredentialsProvider::new(BaseCredentials::new("AKIA", "secret"));

    let creds = provider.provide_credentials().await.unwrap();

    assert_eq!(creds, ResolvedCredentials::new("AKIA", "secret"));
    assert!(creds.session_token.is_none());
    assert!(creds.expires_at.is_none());
    assert_eq!(provider.kind(), SourceKind::SimpleCredentials);
  }
}
