//! Send events and exceptions from the command line

use colored::*;
use eyre::{Context, Result};
use phcap::capture::payload::parse_property;
use phcap::{CaptureError, ExceptionInfo, Outcome, Properties, Reporter};

use crate::cli::PropertyArgs;
use crate::config::Config;

pub fn event(name: &str, args: &PropertyArgs, background: bool, quiet: bool, config: &Config) -> Result<()> {
    let properties = build_properties(args)?;
    let distinct_id = config.distinct_id(args.distinct_id.as_deref());
    let env = config.env();
    let reporter = Reporter::new();

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    if background || config.reporter.background {
        let handle = rt.block_on(async { reporter.spawn_event(&env, name, properties, distinct_id) });
        if let Some(handle) = handle {
            rt.block_on(handle).context("Background capture task failed")?;
        }
        if !quiet {
            println!("{} Dispatched '{}' in background", "✓".green(), name.cyan());
        }
        return Ok(());
    }

    let result = rt.block_on(reporter.try_report_event(&env, name, properties, distinct_id));
    print_outcome(name, result, quiet);
    Ok(())
}

pub fn exception(
    exception_type: &str,
    message: &str,
    stack_trace: Option<&str>,
    args: &PropertyArgs,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let context = build_properties(args)?;
    let distinct_id = config.distinct_id(args.distinct_id.as_deref());
    let env = config.env();

    let mut info = ExceptionInfo::new(exception_type, message);
    if let Some(trace) = stack_trace {
        info = info.with_stack_trace(trace);
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let result = rt.block_on(Reporter::new().try_report_exception(&env, &info, context, distinct_id));
    print_outcome(phcap::capture::EXCEPTION_EVENT, result, quiet);
    Ok(())
}

/// `--properties` JSON first, then each `--prop key=value` on top
fn build_properties(args: &PropertyArgs) -> Result<Option<Properties>> {
    if args.props.is_empty() && args.properties.is_none() {
        return Ok(None);
    }

    let mut properties = match &args.properties {
        Some(json) => serde_json::from_str::<Properties>(json).context("--properties must be a JSON object")?,
        None => Properties::new(),
    };

    for pair in &args.props {
        let (key, value) =
            parse_property(pair).ok_or_else(|| eyre::eyre!("Invalid property '{}', expected KEY=VALUE", pair))?;
        properties.insert(key, value);
    }

    Ok(Some(properties))
}

/// Capture failures are reported, never turned into a non-zero exit
fn print_outcome(name: &str, result: Result<Outcome, CaptureError>, quiet: bool) {
    match result {
        Ok(Outcome::Sent { status }) => {
            if !quiet {
                println!("{} Sent '{}' (HTTP {})", "✓".green(), name.cyan(), status);
            }
        }
        Ok(Outcome::Disabled) => {
            if !quiet {
                println!(
                    "{} Reporting disabled: set {} to send events",
                    "⚠".yellow(),
                    phcap::capture::API_KEY_VAR.cyan()
                );
            }
        }
        Err(e) => {
            log::warn!("PostHog capture error: {}", e);
            eprintln!("{} PostHog capture error: {}", "✗".red(), e);
        }
    }
}
