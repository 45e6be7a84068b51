//! Credential source descriptors and their validation.
//!
//! A descriptor is the validated, strongly typed form of one child element of
//! a `<context-credentials>` declaration. Turning raw nodes into descriptors is
//! the only place attribute values are checked; providers built from a
//! descriptor can assume their keys are present.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::error::{ConfigError, ConfigReport};
use crate::credentials::BaseCredentials;

/// Attribute carrying the access key ID.
pub const ACCESS_KEY_ATTRIBUTE: &str = "access-key";
/// Attribute carrying the secret access key.
pub const SECRET_KEY_ATTRIBUTE: &str = "secret-key";

/// The kinds of credential source a declaration may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
  /// Fixed access/secret key pair
  SimpleCredentials,
  /// Temporary credentials exchanged from a key pair through a security token service
  SecurityTokenCredentials,
  /// Temporary credentials served by the local instance metadata service
  InstanceProfileCredentials,
}

impl SourceKind {
  /// Every supported kind, in documentation order.
  pub const ALL: [SourceKind; 3] = [
    SourceKind::SimpleCredentials,
    SourceKind::SecurityTokenCredentials,
    SourceKind::InstanceProfileCredentials,
  ];

  /// Element name used for this kind in XML declarations.
  pub fn tag_name(self) -> &'static str {
    match self {
      Self::SimpleCredentials => "simple-credentials",
      Self::SecurityTokenCredentials => "security-token-credentials",
      Self::InstanceProfileCredentials => "instance-profile-credentials",
    }
  }

  /// Looks up a kind by its element name.
  pub fn from_tag_name(tag: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|kind| kind.tag_name() == tag)
  }

  /// Attributes that must be present and non-blank for this kind.
  pub fn required_attributes(self) -> &'static [&'static str] {
    match self {
      Self::SimpleCredentials | Self::SecurityTokenCredentials => &[ACCESS_KEY_ATTRIBUTE, SECRET_KEY_ATTRIBUTE],
      Self::InstanceProfileCredentials => &[],
    }
  }
}

impl fmt::Display for SourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag_name())
  }
}

/// One unvalidated credential source as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSourceNode {
  /// Element name, e.g. `simple-credentials`
  pub kind: String,
  /// Attribute values keyed by attribute name
  pub attributes: BTreeMap<String, String>,
}

impl RawSourceNode {
  /// Creates a node with no attributes.
  pub fn new(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      attributes: BTreeMap::new(),
    }
  }

  /// Adds an attribute, returning the node for chaining.
  pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.insert(name.into(), value.into());
    self
  }

  /// Trimmed attribute value, or `None` when absent or blank.
  fn non_blank(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .get(name)
      .map(|value| value.trim())
      .filter(|value| !value.is_empty())
  }
}

/// A validated credential source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSourceDescriptor {
  /// Returns a fixed key pair
  StaticCredentials(BaseCredentials),
  /// Exchanges a key pair for temporary session credentials
  SessionTokenCredentials(BaseCredentials),
  /// Reads temporary credentials from instance metadata
  InstanceProfileCredentials,
}

impl CredentialSourceDescriptor {
  /// The kind of source this descriptor declares.
  pub fn kind(&self) -> SourceKind {
    match self {
      Self::StaticCredentials(_) => SourceKind::SimpleCredentials,
      Self::SessionTokenCredentials(_) => SourceKind::SecurityTokenCredentials,
      Self::InstanceProfileCredentials => SourceKind::InstanceProfileCredentials,
    }
  }

  /// Key pair carried by the descriptor, if the kind has one.
  pub fn base_credentials(&self) -> Option<&BaseCredentials> {
    match self {
      Self::StaticCredentials(base) | Self::SessionTokenCredentials(base) => Some(base),
      Self::InstanceProfileCredentials => None,
    }
  }
}

/// Validates raw source nodes and converts them into descriptors.
///
/// Every node is checked even after a failure; all problems are returned
/// together in node order, and within a node in the order its required
/// attributes are listed.
///
/// # Arguments
/// * `nodes` - Raw sources in declaration order.
///
/// # Returns
/// Descriptors in the same order as `nodes`.
///
/// # Errors
/// Returns a [`ConfigReport`] containing an `UnknownSourceKind` for each
/// unrecognized element and a `MissingAttribute` for each absent or blank
/// required attribute.
pub fn parse_descriptors(nodes: &[RawSourceNode]) -> Result<Vec<CredentialSourceDescriptor>, ConfigReport> {
  let mut report = ConfigReport::new();
  let mut descriptors = Vec::with_capacity(nodes.len());

  for node in nodes {
    match parse_descriptor(node) {
      Ok(descriptor) => {
        debug!("Parsed credential source <{}>", descriptor.kind());
        descriptors.push(descriptor);
      }
      Err(problems) => report.extend(problems),
    }
  }

  report.into_result(descriptors)
}

fn parse_descriptor(node: &RawSourceNode) -> Result<CredentialSourceDescriptor, ConfigReport> {
  let Some(kind) = SourceKind::from_tag_name(&node.kind) else {
    return Err(
      ConfigError::UnknownSourceKind {
        kind: node.kind.clone(),
      }
      .into(),
    );
  };

  let mut report = ConfigReport::new();
  let mut validated = BTreeMap::new();
  for &attribute in kind.required_attributes() {
    match node.non_blank(attribute) {
      Some(value) => {
        validated.insert(attribute, value);
      }
      None => report.push(ConfigError::MissingAttribute {
        source_kind: kind,
        attribute,
      }),
    }
  }
  if !report.is_empty() {
    return Err(report);
  }

  let descriptor = match kind {
    SourceKind::SimpleCredentials => CredentialSourceDescriptor::StaticCredentials(key_pair(kind, &validated)?),
    SourceKind::SecurityTokenCredentials => {
      CredentialSourceDescriptor::SessionTokenCredentials(key_pair(kind, &validated)?)
    }
    SourceKind::InstanceProfileCredentials => CredentialSourceDescriptor::InstanceProfileCredentials,
  };
  Ok(descriptor)
}

/// Builds the key pair from attribute values that passed validation.
fn key_pair(kind: SourceKind, validated: &BTreeMap<&'static str, &str>) -> Result<BaseCredentials, ConfigError> {
  let value = |attribute: &'static str| {
    validated
      .get(attribute)
      .copied()
      .ok_or(ConfigError::MissingAttribute {
        source_kind: kind,
        attribute,
      })
  };
  Ok(BaseCredentials::new(
    value(ACCESS_KEY_ATTRIBUTE)?,
    value(SECRET_KEY_ATTRIBUTE)?,
  ))
}
