//! Configuration errors raised while reading, parsing, and registering
//! credential source declarations.
//!
//! Every variant here is fatal: a configuration that produces one of these
//! must not be used to start the owning scope.

use std::fmt;

use super::descriptor::SourceKind;
use crate::registry::ScopeId;

/// A single problem found in a credentials configuration.
#[derive(Debug)]
pub enum ConfigError {
  /// The document is not well-formed XML
  Xml(roxmltree::Error),
  /// The document contains no `<context-credentials>` element
  MissingDeclaration,
  /// A declaration names a source kind that does not exist
  UnknownSourceKind { kind: String },
  /// A required attribute is absent or blank
  MissingAttribute {
    source_kind: SourceKind,
    attribute: &'static str,
  },
  /// The scope already owns a credential chain
  DuplicateRegistration { scope: ScopeId },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Xml(err) => write!(f, "invalid XML: {err}"),
      Self::MissingDeclaration => write!(f, "no <context-credentials> declaration found"),
      Self::UnknownSourceKind { kind } => write!(f, "unknown credential source <{kind}>"),
      Self::MissingAttribute { source_kind, attribute } => {
        write!(f, "<{source_kind}> requires a non-empty '{attribute}' attribute")
      }
      Self::DuplicateRegistration { scope } => write!(
        f,
        "multiple <context-credentials> declarations for scope '{scope}'; only one is allowed per scope"
      ),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Xml(err) => Some(err),
      _ => None,
    }
  }
}

impl From<roxmltree::Error> for ConfigError {
  fn from(err: roxmltree::Error) -> Self {
    Self::Xml(err)
  }
}

/// Every problem found while processing a configuration.
///
/// Parsing does not stop at the first violation; callers get the full list so
/// an operator can fix a configuration in one pass.
#[derive(Debug, Default)]
pub struct ConfigReport {
  problems: Vec<ConfigError>,
}

impl ConfigReport {
  /// Creates an empty report.
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a problem.
  pub fn push(&mut self, problem: ConfigError) {
    self.problems.push(problem);
  }

  /// Appends every problem from another report.
  pub fn extend(&mut self, other: ConfigReport) {
    self.problems.extend(other.problems);
  }

  /// Returns `true` when no problems were recorded.
  pub fn is_empty(&self) -> bool {
    self.problems.is_empty()
  }

  /// Number of recorded problems.
  pub fn len(&self) -> usize {
    self.problems.len()
  }

  /// Recorded problems in the order they were found.
  pub fn problems(&self) -> &[ConfigError] {
    &self.problems
  }

  /// Converts the report into a `Result`, succeeding with `value` only when
  /// the report is empty.
  pub fn into_result<T>(self, value: T) -> Result<T, ConfigReport> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ConfigReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.problems.len() {
      0 => write!(f, "no configuration problems"),
      1 => write!(f, "{}", self.problems[0]),
      count => {
        write!(f, "{count} configuration problems:")?;
        for problem in &self.problems {
          write!(f, "\n  - {problem}")?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ConfigReport {}

impl From<ConfigError> for ConfigReport {
  fn from(problem: ConfigError) -> Self {
    Self {
      problems: vec![problem],
    }
  }
}
