//! `credential-chain validate`: check a configuration without resolving.

use std::path::Path;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{exit_with_report, read_config_or_exit};
use crate::context::parse_context_credentials;

/// Parse the configuration and report either success or every problem.
///
/// # Arguments
/// * `config` - Path of the XML configuration file.
/// * `cli` - Parsed CLI options carrying the scope name.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) fn handle_validate_command(config: &Path, cli: &Cli, colors: &ColorScheme) {
  let xml = read_config_or_exit(config, colors);
  let scope = cli.source.scope_id();

  match parse_context_credentials(&xml, &scope) {
    Ok(descriptors) => {
      println!(
        "{} {} {}",
        colors.success("✓"),
        colors.path(config.display()),
        colors.success("is valid")
      );
      println!(
        "  {} credential source(s) declared for scope '{}'",
        colors.number(descriptors.len()),
        scope
      );
      if descriptors.is_empty() {
        println!(
          "\n{} {}",
          colors.warning("⚠"),
          colors.warning("The declaration is empty; resolving will always fail")
        );
      }
    }
    Err(report) => exit_with_report(config, &report, colors),
  }
}
