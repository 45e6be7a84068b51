//! Command-line interface definitions for credential-chain.
//!
//! Defines the CLI structure using clap derives and dispatches parsed
//! arguments to the subcommand handlers.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::resolve::handle_resolve_command;
use crate::commands::show::handle_show_command;
use crate::commands::validate::handle_validate_command;
use crate::commands::version::handle_version_command;
use crate::registry::{DEFAULT_SCOPE, ScopeId};

/// credential-chain - Resolve declared cloud credential sources
#[derive(Debug, Parser)]
#[command(
  name = "credential-chain",
  version,
  about = "Resolve declared cloud credential sources",
  long_about = "Reads a <context-credentials> declaration from an XML configuration file, validates it,\n\
                and resolves credentials by trying each declared source in order.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Configuration source options
  #[command(flatten)]
  pub source: SourceOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Check the configuration and report every problem found
  Validate,

  /// List the declared credential sources in resolution order
  Show {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Build the provider chain and resolve credentials once
  Resolve {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

impl Command {
  /// Whether the subcommand reads a credentials configuration file.
  fn needs_config(&self) -> bool {
    matches!(self, Self::Validate | Self::Show { .. } | Self::Resolve { .. })
  }
}

/// Configuration source options
#[derive(Debug, Parser)]
pub struct SourceOptions {
  /// XML file containing the <context-credentials> declaration
  #[arg(short, long, global = true, env = "CREDENTIAL_CHAIN_CONFIG", value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Scope that owns the credential chain
  #[arg(long, global = true, default_value = DEFAULT_SCOPE, value_name = "NAME")]
  pub scope: String,

  /// Overall time limit for resolving credentials, in seconds
  #[arg(
    long,
    global = true,
    env = "CREDENTIAL_CHAIN_TIMEOUT",
    default_value = "30",
    value_name = "SECONDS"
  )]
  pub timeout: u64,
}

impl SourceOptions {
  /// The scope named on the command line.
  pub fn scope_id(&self) -> ScopeId {
    ScopeId::new(self.scope.trim())
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, global = true, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.command.needs_config() {
      self.config_path()?;
    }

    if self.source.scope.trim().is_empty() {
      return Err("--scope must not be empty".to_string());
    }

    if self.source.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    Ok(())
  }

  /// Path of the configuration file, required by `validate`, `show`, and `resolve`.
  pub fn config_path(&self) -> Result<&Path, String> {
    self
      .source
      .config
      .as_deref()
      .ok_or_else(|| "--config (or CREDENTIAL_CHAIN_CONFIG) is required for this command".to_string())
  }
}

/// Parse CLI arguments, initialize logging, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Validate => {
      let config = require_config(&cli, &colors);
      handle_validate_command(config, &cli, &colors);
    }
    Command::Show { json } => {
      let config = require_config(&cli, &colors);
      handle_show_command(config, *json, &cli, &colors);
    }
    Command::Resolve { json } => {
      let config = require_config(&cli, &colors);
      handle_resolve_command(config, *json, &cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn require_config<'a>(cli: &'a Cli, colors: &ColorScheme) -> &'a Path {
  match cli.config_path() {
    Ok(path) => path,
    Err(e) => {
      eprintln!("{} {}", colors.error("Error:"), e);
      process::exit(4);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
