//! Scope-owned registry of credential chains.
//!
//! Each configuration scope owns at most one chain. The registry starts
//! empty, accepts one chain per scope, and forgets a scope's chain when the
//! scope is torn down.
//!
//! A chain is keyed by its [`ScopeId`] alone; the scope is the well-known
//! identifier the chain is installed under, so there is no separate chain name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::config::{ConfigError, CredentialSourceDescriptor};
use crate::credentials::{CredentialProviderChain, ProviderFactory};

/// Scope name used when none is given.
pub const DEFAULT_SCOPE: &str = "application";

/// Identifies the configuration unit that owns a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(String);

impl ScopeId {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for ScopeId {
  fn default() -> Self {
    Self::new(DEFAULT_SCOPE)
  }
}

impl fmt::Display for ScopeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Holds the credential chain registered for each scope.
///
/// Registration needs `&mut self`, so there is a single writer; chains are
/// handed out as `Arc`s and can be resolved concurrently.
#[derive(Default)]
pub struct ScopeRegistry {
  chains: HashMap<ScopeId, Arc<CredentialProviderChain>>,
}

impl ScopeRegistry {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `true` if `scope` already owns a chain.
  pub fn contains(&self, scope: &ScopeId) -> bool {
    self.chains.contains_key(scope)
  }

  /// The chain registered for `scope`, if any.
  pub fn get(&self, scope: &ScopeId) -> Option<Arc<CredentialProviderChain>> {
    self.chains.get(scope).cloned()
  }

  /// Builds a chain from `descriptors` and registers it for `scope`.
  ///
  /// Providers are created in descriptor order through `factory`. No I/O is
  /// performed.
  ///
  /// # Returns
  /// A shared handle to the registered chain.
  ///
  /// # Errors
  /// Returns [`ConfigError::DuplicateRegistration`] without building anything
  /// if `scope` already owns a chain.
  pub fn build_chain(
    &mut self,
    scope: &ScopeId,
    descriptors: &[CredentialSourceDescriptor],
    factory: &dyn ProviderFactory,
  ) -> Result<Arc<CredentialProviderChain>, ConfigError> {
    if self.contains(scope) {
      return Err(ConfigError::DuplicateRegistration { scope: scope.clone() });
    }

    let providers = descriptors.iter().map(|descriptor| factory.create(descriptor)).collect();
    let chain = Arc::new(CredentialProviderChain::new(providers));

    info!(
      "Registered credential chain for scope '{scope}' with {} source(s)",
      chain.len()
    );
    self.chains.insert(scope.clone(), Arc::clone(&chain));
    Ok(chain)
  }

  /// Removes the chain owned by `scope`, returning it if one was registered.
  pub fn teardown(&mut self, scope: &ScopeId) -> Option<Arc<CredentialProviderChain>> {
    self.chains.remove(scope)
  }

  /// Removes every registered chain.
  pub fn clear(&mut self) {
    self.chains.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SourceKind;
  use crate::credentials::{BaseCredentials, DefaultProviderFactory};

  fn static_descriptor(access: &str) -> CredentialSourceDescriptor {
    CredentialSourceDescriptor::StaticCredentials(BaseCredentials::new(access, "secret"))
  }

  #[test]
  fn test_build_chain_preserves_order() {
    let mut registry = ScopeRegistry::new();
    let scope = ScopeId::default();
    let descriptors = vec![
      CredentialSourceDescriptor::InstanceProfileCredentials,
      static_descriptor("AKIA"),
    ];

    let chain = registry
      .build_chain(&scope, &descriptors, &DefaultProviderFactory::default())
      .unwrap();

    assert_eq!(
      chain.sources(),
      vec![SourceKind::InstanceProfileCredentials, SourceKind::SimpleCredentials]
    );
    assert!(registry.contains(&scope));
  }

  #[test]
  fn test_second_build_for_scope_is_rejected() {
    let mut registry = ScopeRegistry::new();
    let scope = ScopeId::new("billing");
    let factory = DefaultProviderFactory::default();

    let first = registry.build_chain(&scope, &[static_descriptor("FIRST")], &factory).unwrap();
    let second = registry.build_chain(&scope, &[static_descriptor("SECOND")], &factory);

    match second {
      Err(ConfigError::DuplicateRegistration { scope: rejected }) => assert_eq!(rejected.as_str(), "billing"),
      Err(other) => panic!("unexpected error: {other}"),
      Ok(_) => panic!("duplicate registration was accepted"),
    }
    let registered = registry.get(&scope).unwrap();
    assert!(Arc::ptr_eq(&first, &registered));
  }

  #[test]
  fn test_scopes_are_independent() {
    let mut registry = ScopeRegistry::new();
    let factory = DefaultProviderFactory::default();

    registry
      .build_chain(&ScopeId::new("a"), &[static_descriptor("A")], &factory)
      .unwrap();
    registry
      .build_chain(&ScopeId::new("b"), &[static_descriptor("B")], &factory)
      .unwrap();

    assert!(registry.contains(&ScopeId::new("a")));
    assert!(registry.contains(&ScopeId::new("b")));
  }

  #[test]
  fn test_chain_is_found_by_scope_name_alone() {
    let mut registry = ScopeRegistry::new();
    let factory = DefaultProviderFactory::default();

    let chain = registry
      .build_chain(&ScopeId::default(), &[static_descriptor("AKIA")], &factory)
      .unwrap();

    let found = registry.get(&ScopeId::new(DEFAULT_SCOPE)).unwrap();
    assert!(Arc::ptr_eq(&chain, &found));
    assert!(registry.get(&ScopeId::new("other")).is_none());
  }

  #[test]
  fn test_teardown_allows_new_registration() {
    let mut registry = ScopeRegistry::new();
    let scope = ScopeId::default();
    let factory = DefaultProviderFactory::default();

    registry.build_chain(&scope, &[static_descriptor("OLD")], &factory).unwrap();
    assert!(registry.teardown(&scope).is_some());
    assert!(registry.get(&scope).is_none());

    registry.build_chain(&scope, &[static_descriptor("NEW")], &factory).unwrap();
    registry.clear();
    assert!(!registry.contains(&scope));
  }
}
