//! Turning descriptors into live providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::instance_profile::{InstanceMetadataService, InstanceProfileCredentialsProvider};
use super::session_token::{DEFAULT_SESSION_DURATION, SessionTokenCredentialsProvider, SessionTokenService};
use super::static_provider::StaticCredentialsProvider;
use super::{BaseCredentials, CredentialError, CredentialsProvider, ResolvedCredentials};
use crate::config::CredentialSourceDescriptor;

/// Creates one provider per descriptor.
///
/// Implementations must not perform I/O; lookups happen when the provider is
/// asked for credentials.
pub trait ProviderFactory {
  fn create(&self, descriptor: &CredentialSourceDescriptor) -> Box<dyn CredentialsProvider>;
}

/// Builds the standard providers around injected remote collaborators.
///
/// [`Default`] wires [`UnconfiguredService`] for both collaborators, so
/// session-token and instance-profile sources fail and the chain falls
/// through to the next declared source.
#[derive(Clone)]
pub struct DefaultProviderFactory {
  session_service: Arc<dyn SessionTokenService>,
  metadata_service: Arc<dyn InstanceMetadataService>,
  session_duration: Duration,
}

impl DefaultProviderFactory {
  /// Creates a factory using the given token and metadata services.
  pub fn new(
    session_service: Arc<dyn SessionTokenService>,
    metadata_service: Arc<dyn InstanceMetadataService>,
  ) -> Self {
    Self {
      session_service,
      metadata_service,
      session_duration: DEFAULT_SESSION_DURATION,
    }
  }

  /// Overrides the session length requested by session-token providers.
  pub fn with_session_duration(mut self, duration: Duration) -> Self {
    self.session_duration = duration;
    self
  }
}

impl Default for DefaultProviderFactory {
  fn default() -> Self {
    Self::new(Arc::new(UnconfiguredService), Arc::new(UnconfiguredService))
  }
}

impl ProviderFactory for DefaultProviderFactory {
  fn create(&self, descriptor: &CredentialSourceDescriptor) -> Box<dyn CredentialsProvider> {
    match descriptor {
      CredentialSourceDescriptor::StaticCredentials(base) => Box::new(StaticCredentialsProvider::new(base.clone())),
      CredentialSourceDescriptor::SessionTokenCredentials(base) => Box::new(
        SessionTokenCredentialsProvider::new(base.clone(), Arc::clone(&self.session_service))
          .with_session_duration(self.session_duration),
      ),
      CredentialSourceDescriptor::InstanceProfileCredentials => Box::new(InstanceProfileCredentialsProvider::new(
        Arc::clone(&self.metadata_service),
      )),
    }
  }
}

/// Placeholder collaborator that fails every lookup with
/// [`CredentialError::Unconfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredService;

#[async_trait]
impl SessionTokenService for UnconfiguredService {
  async fn get_session_token(
    &self,
    _base: &BaseCredentials,
    _duration: Duration,
  ) -> Result<ResolvedCredentials, CredentialError> {
    Err(CredentialError::Unconfigured("security token service"))
  }
}

#[async_trait]
impl InstanceMetadataService for UnconfiguredService {
  async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    Err(CredentialError::Unconfigured("instance metadata service"))
  }
}
