//! Credential providers and the chain that falls back across them.
//!
//! Three kinds of source are supported:
//!
//! - **Static**: a fixed access/secret key pair, no I/O.
//! - **Session token**: a key pair exchanged for temporary credentials through
//!   a [`SessionTokenService`].
//! - **Instance profile**: temporary credentials read through an
//!   [`InstanceMetadataService`].
//!
//! The two remote services are traits. Applications plug in their own
//! implementations through [`DefaultProviderFactory::new`]; the default
//! factory leaves them unconfigured.

mod cache;
mod chain;
mod factory;
mod instance_profile;
mod provider;
mod session_token;
mod static_provider;
mod types;

pub use chain::{CredentialProviderChain, ResolveOptions};
pub use factory::{DefaultProviderFactory, ProviderFactory, UnconfiguredService};
pub use instance_profile::{INSTANCE_REFRESH_WINDOW, InstanceMetadataService, InstanceProfileCredentialsProvider};
pub use provider::CredentialsProvider;
pub use session_token::{
  DEFAULT_SESSION_DURATION, SESSION_REFRESH_WINDOW, SessionTokenCredentialsProvider, SessionTokenService,
};
pub use static_provider::StaticCredentialsProvider;
pub use types::{BaseCredentials, CredentialError, ResolveError, ResolvedCredentials, SourceAttempt, mask_secret};
