//! `credential-chain show`: list declared sources in resolution order.
//!
//! Key values are always masked; the output is safe to paste into a bug
//! report.

use std::fmt::Write as _;
use std::path::Path;
use std::process;

use serde::Serialize;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{exit_with_report, read_config_or_exit};
use crate::config::{CredentialSourceDescriptor, SourceKind};
use crate::context::parse_context_credentials;
use crate::credentials::mask_secret;
use crate::registry::ScopeId;

/// Masked, serializable view of one declared source.
#[derive(Debug, Serialize)]
struct SourceView {
  position: usize,
  kind: SourceKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  access_key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  secret_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScopeView<'a> {
  scope: &'a str,
  sources: Vec<SourceView>,
}

fn source_views(descriptors: &[CredentialSourceDescriptor]) -> Vec<SourceView> {
  descriptors
    .iter()
    .enumerate()
    .map(|(index, descriptor)| {
      let base = descriptor.base_credentials();
      SourceView {
        position: index + 1,
        kind: descriptor.kind(),
        access_key: base.map(|b| mask_secret(b.access_key())),
        secret_key: base.map(|b| "*".repeat(b.secret_key().chars().count())),
      }
    })
    .collect()
}

/// Print the declared sources for the configured scope.
///
/// # Arguments
/// * `config` - Path of the XML configuration file.
/// * `json` - When `true`, emit a JSON document instead of colored text.
/// * `cli` - Parsed CLI options carrying the scope name.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) fn handle_show_command(config: &Path, json: bool, cli: &Cli, colors: &ColorScheme) {
  let xml = read_config_or_exit(config, colors);
  let scope = cli.source.scope_id();

  let descriptors = match parse_context_credentials(&xml, &scope) {
    Ok(descriptors) => descriptors,
    Err(report) => exit_with_report(config, &report, colors),
  };

  if json {
    match render_json(&scope, &descriptors) {
      Ok(document) => println!("{document}"),
      Err(e) => {
        eprintln!("{} Failed to render JSON: {e}", colors.error("✗"));
        process::exit(1);
      }
    }
  } else {
    print!("{}", render_sources(&scope, &descriptors, colors));
  }
}

fn render_json(scope: &ScopeId, descriptors: &[CredentialSourceDescriptor]) -> serde_json::Result<String> {
  serde_json::to_string_pretty(&ScopeView {
    scope: scope.as_str(),
    sources: source_views(descriptors),
  })
}

fn render_sources(scope: &ScopeId, descriptors: &[CredentialSourceDescriptor], colors: &ColorScheme) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{} {}",
    colors.emphasis("Credential sources for scope"),
    colors.emphasis(format!("'{scope}'"))
  );

  if descriptors.is_empty() {
    let _ = writeln!(out, "  {}", colors.dimmed("(none declared)"));
    return out;
  }

  for view in source_views(descriptors) {
    let _ = writeln!(out, "  {}. {}", colors.number(view.position), colors.code(view.kind));
    if let (Some(access), Some(secret)) = (&view.access_key, &view.secret_key) {
      let _ = writeln!(out, "     {}: {}", colors.dimmed("access-key"), access);
      let _ = writeln!(out, "     {}: {}", colors.dimmed("secret-key"), colors.dimmed(secret));
    }
  }
  out
}
