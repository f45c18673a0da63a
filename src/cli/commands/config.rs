//! Config command handler
//!
//! Changes are applied to a copy and saved only when the whole configuration
//! validates.

use crate::args::ConfigSubcommand;
use degree_planner::config::Config;
use degree_planner::{error, info};
use std::io::{self, Write};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    let outcome = match subcommand {
        None => {
            print_all(config);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: None }) => {
            print_all(config);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => lookup(config, &key).map(|value| {
            println!("{value}");
        }),
        Some(ConfigSubcommand::Set { key, value }) => update(config, |c| c.set(&key, &value))
            .and_then(|()| persist(config))
            .map(|()| println!("✓ Set {key} = {value}")),
        Some(ConfigSubcommand::Unset { key }) => update(config, |c| c.unset(&key, defaults))
            .and_then(|()| persist(config))
            .map(|()| println!("✓ Reset {key} to default")),
        Some(ConfigSubcommand::Reset) => reset(),
    };

    if let Err(message) = outcome {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn print_all(config: &Config) {
    println!("\n=== Configuration ===\n");
    print!("{config}");
    if let Err(e) = config.validate() {
        println!("\n✗ {e}");
    }
}

/// Value of `key`, or the list of known keys when it is not recognized
fn lookup(config: &Config, key: &str) -> Result<String, String> {
    config
        .get(key)
        .ok_or_else(|| format!("✗ Unknown config key: '{key}'\n{}", known_keys()))
}

fn known_keys() -> String {
    Config::KEYS
        .iter()
        .map(|(section, keys)| format!("  [{section}] {}", keys.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply `change` to a copy of `config` and keep it only if the result validates
fn update(
    config: &mut Config,
    change: impl FnOnce(&mut Config) -> Result<(), String>,
) -> Result<(), String> {
    let mut candidate = config.clone();
    change(&mut candidate).map_err(|e| format!("✗ {e}"))?;
    candidate.validate().map_err(|e| format!("✗ {e}"))?;
    *config = candidate;
    Ok(())
}

fn persist(config: &Config) -> Result<(), String> {
    config.save().map_err(|e| {
        error!("Failed to save config: {e}");
        format!("✗ Failed to save config: {e}")
    })?;
    info!("Config saved to {}", Config::get_config_file_path().display());
    Ok(())
}

fn reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();
    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if !matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        println!("✗ Reset cancelled");
        return Ok(());
    }
    Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
    println!("✓ Config reset to defaults");
    Ok(())
}
