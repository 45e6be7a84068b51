//! Credentials configuration: reading declarations from XML and validating
//! them into typed descriptors.
//!
//! # Example declaration
//!
//! ```text
//! <cc:context-credentials>
//!   <cc:simple-credentials access-key="AKIA..." secret-key="..."/>
//!   <cc:security-token-credentials access-key="AKIA..." secret-key="..."/>
//!   <cc:instance-profile-credentials/>
//! </cc:context-credentials>
//! ```
//!
//! Sources are tried in the order they are declared.

mod descriptor;
mod error;
mod xml;

pub use descriptor::{
  ACCESS_KEY_ATTRIBUTE, CredentialSourceDescriptor, RawSourceNode, SECRET_KEY_ATTRIBUTE, SourceKind, parse_descriptors,
};
pub use error::{ConfigError, ConfigReport};
pub use xml::{DECLARATION_ELEMENT, Declaration, read_declarations};
