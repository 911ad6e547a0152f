use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Query Assistant - turn plain-language requests into PostgreSQL queries
#[derive(Parser, Debug)]
#[command(name = "query-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    pub format: Format,

    /// Show extracted parameters, rule templates and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a natural-language request into SQL
    Translate {
        /// Request text
        #[arg(required_unless_present = "batch")]
        text: Option<String>,

        /// File with one request per line (use - for stdin)
        #[arg(short, long, conflicts_with = "text")]
        batch: Option<PathBuf>
    },

    /// Run the static safety check on SQL (use - for stdin)
    Check {
        sql: String,

        /// Also require a SELECT statement
        #[arg(long)]
        readonly: bool
    },

    /// Suggest optimizations for SQL (use - for stdin)
    Optimize { sql: String },

    /// Recommend indexes and tuning from database statistics
    Recommend {
        /// JSON file with database statistics; fetched from the dashboard if
        /// omitted
        #[arg(short, long)]
        stats: Option<PathBuf>,

        #[command(flatten)]
        remote: RemoteArgs
    },

    /// Build security alerts from catalog findings
    Audit {
        /// JSON file with audit findings; fetched from the dashboard if
        /// omitted
        #[arg(long)]
        findings: Option<PathBuf>,

        #[command(flatten)]
        remote: RemoteArgs
    },

    /// Execute SQL through the dashboard after local safety gating
    Execute {
        /// SQL to execute (use - for stdin)
        sql: String,

        /// Skip the safety check (the dashboard skips it too)
        #[arg(long)]
        no_safety_check: bool,

        #[command(flatten)]
        remote: RemoteArgs
    },

    /// List the active pattern rules
    Rules,

    /// Print the catalog queries behind stats and audit input files
    Catalog
}

/// Dashboard connection options
#[derive(Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// Dashboard API base URL
    #[arg(long, env = "DASHBOARD_URL")]
    pub url: Option<String>,

    /// Database environment on the dashboard
    #[arg(long = "env", env = "DASHBOARD_ENV")]
    pub environment: Option<String>
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
