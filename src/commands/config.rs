use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "phcap Configuration".bold());
            println!();

            println!("log_level: {}", config.log_level.as_filter());
            println!();

            println!("{}:", "reporter".cyan());
            println!("  api_key: {}", if config.reporter.api_key.is_some() { "(set)" } else { "(unset)" });
            println!("  host: {}", config.reporter.host.as_deref().unwrap_or("(unset)"));
            println!(
                "  distinct_id: {}",
                config.reporter.distinct_id.as_deref().unwrap_or("(unset)")
            );
            println!("  background: {}", config.reporter.background);
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    let value = lookup(key, config);

    match value {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown or unset config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        "reporter.api_key" => config.reporter.api_key.clone(),
        "reporter.host" => config.reporter.host.clone(),
        "reporter.distinct_id" => config.reporter.distinct_id.clone(),
        "reporter.background" => Some(config.reporter.background.to_string()),
        _ => None,
    }
}
