//! Temporary credentials from the instance metadata service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;

use super::cache::CredentialsCache;
use super::{CredentialError, CredentialsProvider, ResolvedCredentials};
use crate::config::SourceKind;

/// How long before expiry cached instance credentials are replaced.
pub const INSTANCE_REFRESH_WINDOW: TimeDelta = TimeDelta::minutes(15);

/// Reads the role credentials attached to the current compute instance.
#[async_trait]
pub trait InstanceMetadataService: Send + Sync {
  /// Fetches the instance's current role credentials.
  ///
  /// # Errors
  /// Returns a [`CredentialError`] when no metadata service is reachable or
  /// the instance has no role attached.
  async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError>;
}

/// Provides credentials for the role attached to the running instance.
pub struct InstanceProfileCredentialsProvider {
  service: Arc<dyn InstanceMetadataService>,
  cache: CredentialsCache,
}

impl InstanceProfileCredentialsProvider {
  pub fn new(service: Arc<dyn InstanceMetadataService>) -> Self {
    Self {
      service,
      cache: CredentialsCache::new(INSTANCE_REFRESH_WINDOW),
    }
  }
}

#[async_trait]
impl CredentialsProvider for InstanceProfileCredentialsProvider {
  fn kind(&self) -> SourceKind {
    SourceKind::InstanceProfileCredentials
  }

  async fn provide_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    self.cache.get_or_load(|| self.service.fetch_instance_credentials()).await
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use chrono::Utc;

  use super::*;

  struct FakeMetadata {
    lifetime: TimeDelta,
    calls: AtomicUsize,
  }

  #[async_trait]
  impl InstanceMetadataService for FakeMetadata {
    async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(
        ResolvedCredentials::new("ASIAINSTANCE", "instance-secret")
          .with_session_token("instance-token")
          .with_expiry(Utc::now() + self.lifetime),
      )
    }
  }

  #[tokio::test]
  async fn test_caches_instance_credentials() {
    let service = Arc::new(FakeMetadata {
      lifetime: TimeDelta::hours(6),
      calls: AtomicUsize::new(0),
    });
    let provider = InstanceProfileCredentialsProvider::new(service.clone());

    let creds = provider.provide_credentials().await.unwrap();
    provider.provide_credentials().await.unwrap();

    assert_eq!(creds.access_key, "ASIAINSTANCE");
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refreshes_within_fifteen_minutes_of_expiry() {
    let service = Arc::new(FakeMetadata {
      lifetime: TimeDelta::minutes(10),
      calls: AtomicUsize::new(0),
    });
    let provider = InstanceProfileCredentialsProvider::new(service.clone());

    provider.provide_credentials().await.unwrap();
    provider.provide_credentials().await.unwrap();

    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_propagates_metadata_failure() {
    struct Unreachable;

    #[async_trait]
    impl InstanceMetadataService for Unreachable {
      async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
        Err(CredentialError::NotLoaded("no instance role".to_string()))
      }
    }

    let provider = InstanceProfileCredentialsProvider::new(Arc::new(Unreachable));

    let result = provider.provide_credentials().await;

    assert!(matches!(result, Err(CredentialError::NotLoaded(_))));
  }
}
