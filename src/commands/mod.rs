//! CLI subcommand handlers.
//!
//! Each handler prints its own output and terminates the process with a
//! meaningful exit code on failure:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 1 | configuration file could not be read |
//! | 2 | no credentials could be resolved |
//! | 3 | configuration is invalid |
//! | 4 | invalid command-line arguments |

pub mod completions;
pub mod resolve;
pub mod show;
pub mod validate;
pub mod version;

use std::path::Path;
use std::process;

use anyhow::Context;

use crate::color::ColorScheme;
use crate::config::ConfigReport;

/// Read the configuration file, exiting with code 1 if it cannot be read.
pub(crate) fn read_config_or_exit(path: &Path, colors: &ColorScheme) -> String {
  match read_config(path) {
    Ok(xml) => xml,
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("✗"));
      process::exit(1);
    }
  }
}

fn read_config(path: &Path) -> anyhow::Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("Failed to read configuration file {}", path.display()))
}

/// Print every configuration problem and exit with code 3.
pub(crate) fn exit_with_report(path: &Path, report: &ConfigReport, colors: &ColorScheme) -> ! {
  eprintln!(
    "{} {} {}",
    colors.error("✗"),
    colors.error("Invalid credentials configuration:"),
    colors.path(path.display())
  );
  for problem in report.problems() {
    eprintln!("  {} {problem}", colors.warning("•"));
  }
  process::exit(3);
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn test_read_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<context-credentials/>").unwrap();

    assert_eq!(read_config(file.path()).unwrap(), "<context-credentials/>");
  }

  #[test]
  fn test_read_missing_config_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xml");

    let err = read_config(&path).unwrap_err();

    assert!(format!("{err:#}").contains("missing.xml"));
  }
}
