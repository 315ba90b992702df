// Config command - print the effective configuration

use anyhow::Result;
use std::path::Path;

use crate::config::{self, Config};

pub fn handle_show_config(config: &Config, source: Option<&Path>) -> Result<()> {
    println!("Current configuration:");

    match source {
        Some(path) => println!("\n  Configuration file: {}", path.display()),
        None => {
            println!("\n  No configuration file loaded");
            println!("  Create one with: resultsink init-config .resultsinkrc.toml");
        }
    }

    println!("\n{}", render(config));

    println!("  Environment variables:");
    for key in [
        config::ENV_PUBLISH_RESULTS,
        config::ENV_ELASTIC_URL,
        config::ENV_ELASTIC_INDEX,
        config::ENV_ELASTIC_API_KEY,
    ] {
        let shown = match std::env::var(key) {
            Ok(_) if key == config::ENV_ELASTIC_API_KEY => "set".to_string(),
            Ok(value) => value,
            Err(_) => "not set".to_string(),
        };
        println!("    {}: {}", key, shown);
    }

    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Environment variables");
    println!("  3. Configuration file");
    println!("  4. Built-in defaults (lowest)");

    Ok(())
}

/// Effective configuration as TOML, with secrets masked
pub fn render(config: &Config) -> String {
    let masked = Config {
        elastic: config.elastic.masked(),
        ..config.clone()
    };
    masked.to_toml()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_masks_password() {
        let mut config = Config::default();
        config.elastic.username = Some("elastic".to_string());
        config.elastic.password = Some("hunter2".to_string());

        let rendered = render(&config);
        assert!(rendered.contains("elastic"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("********"));
    }
}
