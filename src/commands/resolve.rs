//! `credential-chain resolve`: build the chain and resolve credentials once.

use std::fmt::Write as _;
use std::path::Path;
use std::process;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::{exit_with_report, read_config_or_exit};
use crate::config::SourceKind;
use crate::context::load_context_credentials;
use crate::credentials::{DefaultProviderFactory, ResolveError, ResolveOptions, ResolvedCredentials, mask_secret};
use crate::registry::ScopeRegistry;

/// Load the configuration, register its chain, and resolve credentials.
///
/// Ctrl-C cancels the lookup in flight. The secret key and session token are
/// never printed in full.
///
/// # Arguments
/// * `config` - Path of the XML configuration file.
/// * `json` - When `true`, emit a JSON document instead of colored text.
/// * `cli` - Parsed CLI options carrying the scope name and timeout.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) async fn handle_resolve_command(config: &Path, json: bool, cli: &Cli, colors: &ColorScheme) {
  let xml = read_config_or_exit(config, colors);
  let scope = cli.source.scope_id();
  let mut registry = ScopeRegistry::new();
  let factory = DefaultProviderFactory::default();

  let chain = match load_context_credentials(&mut registry, &scope, &xml, &factory) {
    Ok(chain) => chain,
    Err(report) => exit_with_report(config, &report, colors),
  };

  let cancel = CancellationToken::new();
  let on_interrupt = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      debug!("Interrupt received, cancelling credential resolution");
      on_interrupt.cancel();
    }
  });

  let options = ResolveOptions::default()
    .with_timeout(Duration::from_secs(cli.source.timeout))
    .with_cancellation(cancel);

  if !json {
    println!(
      "{} {} ({} source(s), scope '{}')",
      colors.info("→"),
      colors.info("Resolving credentials"),
      colors.number(chain.len()),
      scope
    );
  }

  let outcome = chain.resolve_detailed(&options).await;
  registry.teardown(&scope);

  match outcome {
    Ok((kind, credentials)) if json => println!("{:#}", resolution_json(kind, &credentials)),
    Ok((kind, credentials)) => print!("{}", render_resolution(kind, &credentials, colors)),
    Err(e) => {
      eprint!("{}", render_failure(&e, colors));
      process::exit(2);
    }
  }
}

fn resolution_json(kind: SourceKind, credentials: &ResolvedCredentials) -> serde_json::Value {
  json!({
    "source": kind,
    "access_key": credentials.access_key,
    "secret_key": mask_secret(&credentials.secret_key),
    "session_token": credentials.session_token.is_some(),
    "expires_at": credentials.expires_at.map(|expiry| expiry.to_rfc3339()),
  })
}

fn render_resolution(kind: SourceKind, credentials: &ResolvedCredentials, colors: &ColorScheme) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "\n{} {}", colors.success("✓"), colors.success("Credentials resolved"));
  let _ = writeln!(out, "  {}: {}", colors.emphasis("Source"), colors.code(kind));
  let _ = writeln!(out, "  {}: {}", colors.emphasis("Access key"), credentials.access_key);
  let _ = writeln!(
    out,
    "  {}: {}",
    colors.emphasis("Secret key"),
    colors.dimmed(mask_secret(&credentials.secret_key))
  );
  if credentials.session_token.is_some() {
    let _ = writeln!(out, "  {}: {}", colors.emphasis("Session token"), colors.dimmed("present"));
  }
  match credentials.expires_at {
    Some(expiry) => {
      let _ = writeln!(
        out,
        "  {}: {}",
        colors.emphasis("Expires"),
        expiry.format("%Y-%m-%d %H:%M:%S UTC")
      );
    }
    None => {
      let _ = writeln!(out, "  {}: {}", colors.emphasis("Expires"), colors.dimmed("never"));
    }
  }
  out
}

fn render_failure(error: &ResolveError, colors: &ColorScheme) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "\n{} {}", colors.error("✗"), colors.error(error));
  for attempt in error.attempts() {
    let _ = writeln!(
      out,
      "  {} {}: {}",
      colors.warning("•"),
      colors.code(attempt.kind),
      attempt.error
    );
  }
  if let ResolveError::NoCredentialsAvailable { attempted } = error
    && attempted.is_empty()
  {
    let _ = writeln!(
      out,
      "\n{}",
      colors.dimmed("Add a source to the <context-credentials> declaration.")
    );
  }
  out
}
