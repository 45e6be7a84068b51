//! Fake remote collaborators for testing
//!
//! These stand in for the security token service and the instance metadata
//! service. They answer from canned data, record how often they are called,
//! and never touch the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use credential_chain::credentials::{
  BaseCredentials, CredentialError, InstanceMetadataService, ResolvedCredentials, SessionTokenService,
};

/// A fake token service that issues session credentials or refuses to.
pub struct FakeTokenService {
  succeed: bool,
  lifetime: TimeDelta,
  calls: AtomicUsize,
}

impl FakeTokenService {
  /// Create a service that issues credentials valid for one hour
  pub fn issuing() -> Arc<Self> {
    Arc::new(Self {
      succeed: true,
      lifetime: TimeDelta::hours(1),
      calls: AtomicUsize::new(0),
    })
  }

  /// Create a service that rejects every request
  pub fn rejecting() -> Arc<Self> {
    Arc::new(Self {
      succeed: false,
      lifetime: TimeDelta::zero(),
      calls: AtomicUsize::new(0),
    })
  }

  /// Number of token requests received so far
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl SessionTokenService for FakeTokenService {
  async fn get_session_token(
    &self,
    base: &BaseCredentials,
    _duration: Duration,
  ) -> Result<ResolvedCredentials, CredentialError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if !self.succeed {
      return Err(CredentialError::ProviderError("access denied".into()));
    }
    Ok(
      ResolvedCredentials::new(format!("ASIA-{}", base.access_key()), "session-secret-value")
        .with_session_token("session-token")
        .with_expiry(Utc::now() + self.lifetime),
    )
  }
}

/// A fake metadata service that either has a role attached or not.
pub struct FakeMetadataService {
  role_attached: bool,
  calls: AtomicUsize,
}

impl FakeMetadataService {
  /// Create a service reporting credentials for an attached role
  pub fn with_role() -> Arc<Self> {
    Arc::new(Self {
      role_attached: true,
      calls: AtomicUsize::new(0),
    })
  }

  /// Create a service for an instance without a role
  pub fn without_role() -> Arc<Self> {
    Arc::new(Self {
      role_attached: false,
      calls: AtomicUsize::new(0),
    })
  }

  /// Number of metadata lookups received so far
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl InstanceMetadataService for FakeMetadataService {
  async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if !self.role_attached {
      return Err(CredentialError::NotLoaded("no role attached to this instance".to_string()));
    }
    Ok(
      ResolvedCredentials::new("ASIAINSTANCE", "instance-secret-value")
        .with_session_token("instance-token")
        .with_expiry(Utc::now() + TimeDelta::hours(6)),
    )
  }
}

/// A metadata service that never answers.
pub struct HangingMetadataService;

#[async_trait]
impl InstanceMetadataService for HangingMetadataService {
  async fn fetch_instance_credentials(&self) -> Result<ResolvedCredentials, CredentialError> {
    std::future::pending().await
  }
}
