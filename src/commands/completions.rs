//! Shell completion generation.

use std::io;

use clap::{CommandFactory, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};

use crate::cli::Cli;

/// Shells supported by `credential-chain completions`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

impl From<Shell> for CompletionShell {
  fn from(shell: Shell) -> Self {
    match shell {
      Shell::Bash => CompletionShell::Bash,
      Shell::Zsh => CompletionShell::Zsh,
      Shell::Fish => CompletionShell::Fish,
      Shell::Powershell => CompletionShell::PowerShell,
      Shell::Elvish => CompletionShell::Elvish,
    }
  }
}

/// Write the completion script for `shell` to stdout.
pub(crate) fn handle_completions_command(shell: Shell) {
  write_completions(shell, &mut io::stdout());
}

fn write_completions(shell: Shell, out: &mut dyn io::Write) {
  let mut cmd = Cli::command();
  let bin_name = cmd.get_name().to_string();

  generate(CompletionShell::from(shell), &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bash_completions_cover_subcommands() {
    let mut out = Vec::new();

    write_completions(Shell::Bash, &mut out);

    let script = String::from_utf8(out).unwrap();
    assert!(script.contains("credential-chain"));
    assert!(script.contains("resolve"));
    assert!(script.contains("--timeout"));
  }
}
