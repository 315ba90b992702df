// Commands module - handles CLI command execution

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;

pub mod init;
pub mod publish;
pub mod show;

pub use init::handle_init_config;
pub use publish::handle_publish;
pub use show::handle_show_config;

/// Resolve configuration for a command.
///
/// An explicitly named file must be readable; the default lookup never fails.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            let config = Config::load_from_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?;
            Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
        }
        None => Ok(Config::load()),
    }
}

/// Write the completion script for `shell` to `out`
pub fn write_completion<W: std::io::Write>(shell: clap_complete::Shell, out: &mut W) {
    use clap::CommandFactory;

    let mut cmd = crate::cli::Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, out);
}

pub fn handle_completion(shell: clap_complete::Shell) -> Result<()> {
    write_completion(shell, &mut std::io::stdout().lock());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completion_mentions_subcommands() {
        let mut out = Vec::new();
        write_completion(clap_complete::Shell::Bash, &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("resultsink"));
        assert!(script.contains("init-config"));
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing)).is_err());
    }
}
