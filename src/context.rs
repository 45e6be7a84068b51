//! Start-up entry point: from configuration text to a registered chain.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ConfigError, ConfigReport, CredentialSourceDescriptor, parse_descriptors, read_declarations};
use crate::credentials::{CredentialProviderChain, ProviderFactory};
use crate::registry::{ScopeId, ScopeRegistry};

/// Parses a credentials declaration without building anything.
///
/// Every declaration in the document is validated so the report covers the
/// whole file. Any declaration after the first is reported as a duplicate for
/// `scope`.
///
/// # Returns
/// Descriptors of the single declaration, in declaration order.
///
/// # Errors
/// Returns a [`ConfigReport`] with every problem found.
pub fn parse_context_credentials(
  xml: &str,
  scope: &ScopeId,
) -> Result<Vec<CredentialSourceDescriptor>, ConfigReport> {
  let declarations = read_declarations(xml)?;
  if declarations.is_empty() {
    return Err(ConfigError::MissingDeclaration.into());
  }

  let mut report = ConfigReport::new();
  let mut first = None;

  for (index, declaration) in declarations.iter().enumerate() {
    debug!(
      "Parsing credentials declaration at line {} ({} source(s))",
      declaration.line,
      declaration.sources.len()
    );
    match parse_descriptors(&declaration.sources) {
      Ok(descriptors) if index == 0 => first = Some(descriptors),
      Ok(_) => {}
      Err(problems) => report.extend(problems),
    }
    if index > 0 {
      report.push(ConfigError::DuplicateRegistration { scope: scope.clone() });
    }
  }

  report.into_result(first.unwrap_or_default())
}

/// Parses a credentials declaration and registers the resulting chain for
/// `scope`.
///
/// # Arguments
/// * `registry` - Registry that will own the chain.
/// * `scope` - Scope the declaration belongs to.
/// * `xml` - Document containing exactly one `<context-credentials>` element.
/// * `factory` - Creates the live providers.
///
/// # Returns
/// The registered chain.
///
/// # Errors
/// Returns a [`ConfigReport`] when the document is malformed, declares no or
/// several credential sets, contains invalid sources, or when `scope` already
/// owns a chain.
pub fn load_context_credentials(
  registry: &mut ScopeRegistry,
  scope: &ScopeId,
  xml: &str,
  factory: &dyn ProviderFactory,
) -> Result<Arc<CredentialProviderChain>, ConfigReport> {
  let descriptors = parse_context_credentials(xml, scope)?;
  Ok(registry.build_chain(scope, &descriptors, factory)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SourceKind;
  use crate::credentials::DefaultProviderFactory;

  #[test]
  fn test_missing_declaration() {
    let report = parse_context_credentials("<beans/>", &ScopeId::default()).unwrap_err();

    assert!(matches!(report.problems(), [ConfigError::MissingDeclaration]));
  }

  #[test]
  fn test_second_declaration_is_duplicate() {
    let xml = r#"<beans>
  <context-credentials><instance-profile-credentials/></context-credentials>
  <context-credentials><instance-profile-credentials/></context-credentials>
</beans>"#;

    let report = parse_context_credentials(xml, &ScopeId::default()).unwrap_err();

    assert!(matches!(
      report.problems(),
      [ConfigError::DuplicateRegistration { .. }]
    ));
  }

  #[test]
  fn test_problems_from_all_declarations_are_reported() {
    let xml = r#"<beans>
  <context-credentials><simple-credentials secret-key="x"/></context-credentials>
  <context-credentials><mystery-credentials/></context-credentials>
</beans>"#;

    let report = parse_context_credentials(xml, &ScopeId::default()).unwrap_err();

    assert_eq!(report.len(), 3);
    assert!(matches!(report.problems()[0], ConfigError::MissingAttribute { .. }));
    assert!(matches!(report.problems()[1], ConfigError::UnknownSourceKind { .. }));
    assert!(matches!(report.problems()[2], ConfigError::DuplicateRegistration { .. }));
  }

  #[test]
  fn test_load_registers_chain() {
    let xml = r#"<context-credentials>
  <security-token-credentials access-key="AKIA" secret-key="secret"/>
  <simple-credentials access-key="AKIB" secret-key="secret"/>
</context-credentials>"#;
    let mut registry = ScopeRegistry::new();
    let scope = ScopeId::default();

    let chain = load_context_credentials(&mut registry, &scope, xml, &DefaultProviderFactory::default()).unwrap();

    assert_eq!(
      chain.sources(),
      vec![SourceKind::SecurityTokenCredentials, SourceKind::SimpleCredentials]
    );
    assert!(registry.contains(&scope));

    let again = load_context_credentials(&mut registry, &scope, xml, &DefaultProviderFactory::default());
    assert!(matches!(
      again.err().as_ref().map(ConfigReport::problems),
      Some([ConfigError::DuplicateRegistration { .. }])
    ));
  }
}
