//! Show the resolved reporter configuration

use colored::*;
use eyre::Result;
use phcap::ReporterConfig;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;

#[derive(Debug, Serialize)]
struct Status {
    enabled: bool,
    api_key: Option<String>,
    host: String,
    capture_url: String,
    distinct_id: String,
    background: bool,
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let status = collect(config);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&status)?);
        }
        OutputFormat::Text => {
            println!("{}", "phcap Status".bold());
            println!("{}", "═".repeat(50));
            println!();

            if status.enabled {
                println!("{} Reporting enabled", "✓".green());
            } else {
                println!("{} Reporting disabled", "✗".red());
                println!("  Set {} to a project API key", phcap::capture::API_KEY_VAR.cyan());
            }

            println!("  api_key: {}", status.api_key.as_deref().unwrap_or("(unset)").dimmed());
            println!("  host: {}", status.host);
            println!("  capture_url: {}", status.capture_url.cyan());
            println!("  distinct_id: {}", status.distinct_id);
            println!("  background: {}", status.background);
        }
    }

    Ok(())
}

fn collect(config: &Config) -> Status {
    let resolved = ReporterConfig::from_env(&config.env());

    Status {
        enabled: resolved.is_enabled(),
        api_key: resolved.masked_key(),
        capture_url: resolved.capture_url(),
        host: resolved.host,
        distinct_id: config
            .distinct_id(None)
            .unwrap_or(phcap::capture::DEFAULT_DISTINCT_ID)
            .to_string(),
        background: config.reporter.background,
    }
}
