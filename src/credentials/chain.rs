//! Ordered fallback across several credential providers.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, error::Elapsed};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span};

use super::{CredentialsProvider, ResolveError, ResolvedCredentials, SourceAttempt, mask_secret};
use crate::config::SourceKind;

/// Limits applied to a single resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
  /// Overall deadline for the whole walk of the chain
  pub timeout: Option<Duration>,
  /// Stops the walk, dropping the in-flight attempt
  pub cancel: Option<CancellationToken>,
}

impl ResolveOptions {
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = Some(token);
    self
  }
}

/// Providers tried in declaration order until one yields credentials.
///
/// The provider list is fixed at construction. Resolution only reads it, so a
/// chain behind an `Arc` can be resolved from many tasks at once.
pub struct CredentialProviderChain {
  providers: Vec<Box<dyn CredentialsProvider>>,
}

impl std::fmt::Debug for CredentialProviderChain {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CredentialProviderChain").field("providers", &self.sources()).finish()
  }
}

impl CredentialProviderChain {
  /// Creates a chain that tries `providers` in the given order.
  pub fn new(providers: Vec<Box<dyn CredentialsProvider>>) -> Self {
    Self { providers }
  }

  /// Number of providers in the chain.
  pub fn len(&self) -> usize {
    self.providers.len()
  }

  /// Returns `true` when the chain has no providers.
  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  /// Kinds of the providers, in the order they will be tried.
  pub fn sources(&self) -> Vec<SourceKind> {
    self.providers.iter().map(|provider| provider.kind()).collect()
  }

  /// Returns credentials from the first provider that succeeds.
  ///
  /// # Errors
  /// Returns [`ResolveError::NoCredentialsAvailable`] listing every attempt
  /// when all providers fail.
  pub async fn resolve(&self) -> Result<ResolvedCredentials, ResolveError> {
    self.resolve_with(&ResolveOptions::default()).await
  }

  /// Like [`resolve`](Self::resolve), honoring a timeout and cancellation.
  ///
  /// # Errors
  /// In addition to exhaustion, returns [`ResolveError::TimedOut`] or
  /// [`ResolveError::Cancelled`]; no provider is tried after either.
  pub async fn resolve_with(&self, options: &ResolveOptions) -> Result<ResolvedCredentials, ResolveError> {
    self
      .resolve_detailed(options)
      .await
      .map(|(_, credentials)| credentials)
  }

  /// Resolves credentials and reports which kind of source supplied them.
  ///
  /// # Errors
  /// Same as [`resolve_with`](Self::resolve_with).
  pub async fn resolve_detailed(
    &self,
    options: &ResolveOptions,
  ) -> Result<(SourceKind, ResolvedCredentials), ResolveError> {
    // A deadline past the end of the clock means no deadline.
    let deadline = options
      .timeout
      .and_then(|timeout| Instant::now().checked_add(timeout));
    let mut attempted = Vec::with_capacity(self.providers.len());

    for provider in &self.providers {
      let kind = provider.kind();
      if options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
        debug!("Credential resolution cancelled before trying {kind}");
        return Err(ResolveError::Cancelled {
          attempted,
          interrupted: None,
        });
      }
      let span = info_span!("provide_credentials", source = %kind);
      let attempt = within_deadline(deadline, provider.provide_credentials().instrument(span));

      let outcome = tokio::select! {
        biased;
        () = cancelled(options.cancel.as_ref()) => {
          debug!("Credential resolution cancelled while trying {kind}");
          return Err(ResolveError::Cancelled {
            attempted,
            interrupted: Some(kind),
          });
        }
        outcome = attempt => outcome,
      };

      match outcome {
        Ok(Ok(credentials)) => {
          info!(
            "Loaded credentials from {kind} (access key {})",
            mask_secret(&credentials.access_key)
          );
          return Ok((kind, credentials));
        }
        Ok(Err(error)) => {
          debug!("Provider {kind} did not provide credentials: {error}");
          attempted.push(SourceAttempt { kind, error });
        }
        Err(_elapsed) => {
          debug!("Timed out waiting for {kind}");
          return Err(ResolveError::TimedOut {
            attempted,
            interrupted: kind,
          });
        }
      }
    }

    Err(ResolveError::NoCredentialsAvailable { attempted })
  }
}

/// Runs `future` to completion or until `deadline`, whichever comes first.
async fn within_deadline<F: Future>(deadline: Option<Instant>, future: F) -> Result<F::Output, Elapsed> {
  match deadline {
    Some(deadline) => tokio::time::timeout_at(deadline, future).await,
    None => Ok(future.await),
  }
}

/// Completes once `token` is cancelled; never completes without a token.
async fn cancelled(token: Option<&CancellationToken>) {
  match token {
    Some(token) => token.cancelled().await,
    None => std::future::pending().await,
  }
}
