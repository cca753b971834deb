use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "phcap",
    about = "Send PostHog events and exceptions from the command line",
    version = env!("GIT_DESCRIBE"),
    after_help = "Reads POSTHOG_API_KEY and POSTHOG_HOST from the environment, falling back to phcap.yaml.\n\nLogs are written to: ~/.local/share/phcap/logs/phcap.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to phcap.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a named event
    Event {
        /// Event name
        name: String,

        #[command(flatten)]
        props: PropertyArgs,

        /// Don't wait for the collector inline; spawn the request and join it before exit
        #[arg(long)]
        background: bool,
    },

    /// Capture an $exception event
    Exception {
        /// Exception type name (e.g. ValueError)
        exception_type: String,

        /// Exception message
        message: String,

        /// Stack trace text to attach
        #[arg(long)]
        stack_trace: Option<String>,

        #[command(flatten)]
        props: PropertyArgs,
    },

    /// Show whether reporting is enabled and where events go
    Status {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Properties and identity shared by the capture commands
#[derive(clap::Args, Debug, Default)]
pub struct PropertyArgs {
    /// Property as key=value; value is parsed as JSON when possible (repeatable)
    #[arg(short = 'p', long = "prop", value_name = "KEY=VALUE")]
    pub props: Vec<String>,

    /// Properties as a JSON object, applied before --prop
    #[arg(long, value_name = "JSON")]
    pub properties: Option<String>,

    /// Distinct id to attribute the event to
    #[arg(short = 'd', long)]
    pub distinct_id: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}
