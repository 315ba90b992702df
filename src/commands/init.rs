// Init-config command - write a default configuration file

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::InitConfigArgs;
use crate::config::Config;

pub fn handle_init_config(args: &InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let content = format!(
        "# resultsink configuration\n# Set publish.enabled = true (or {}=true) to send results.\n\n{}",
        crate::config::ENV_PUBLISH_RESULTS,
        Config::default().to_toml()
    );

    std::fs::write(&args.path, content)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    info!("Created configuration file: {}", args.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_roundtrips() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = InitConfigArgs {
            path: dir.path().join(".resultsinkrc.toml"),
            force: false,
        };

        handle_init_config(&args).unwrap();
        let loaded = Config::load_from_file(&args.path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("existing.toml");
        std::fs::write(&path, "keep me").unwrap();

        let args = InitConfigArgs {
            path: path.clone(),
            force: false,
        };
        assert!(handle_init_config(&args).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");

        let args = InitConfigArgs { path, force: true };
        assert!(handle_init_config(&args).is_ok());
    }
}
