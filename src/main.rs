//! # Query Assistant
//!
//! Plain-language requests to PostgreSQL queries, with the safety and
//! optimization heuristics a database dashboard applies before running them.
//!
//! `query-assistant` matches a request against an ordered table of pattern
//! rules. The rule with the highest static confidence wins; if none reaches
//! 0.7 the assistant guesses a table from the request's words and returns a
//! bounded `SELECT`. It never refuses, so always look at the confidence:
//! 0.5 means the query is a guess.
//!
//! # Quick Start
//!
//! ```bash
//! # Translate a request
//! query-assistant translate "how many users"
//!
//! # Translate one request per line, as JSON
//! query-assistant translate --batch requests.txt -f json
//!
//! # Gate arbitrary SQL (exit code 2 when rejected)
//! echo "DELETE FROM users" | query-assistant check -
//!
//! # Advisory suggestions
//! query-assistant optimize "SELECT * FROM users ORDER BY created_at"
//!
//! # Recommendations and audit from exported catalog rows, or from the dashboard
//! query-assistant recommend --stats stats.json
//! query-assistant audit --url http://localhost:5002 --env prod
//!
//! # Execute through the dashboard after the local safety gate
//! query-assistant execute "SELECT id FROM users LIMIT 5" --env dev
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`DASHBOARD_URL`, `DASHBOARD_ENV`)
//! 3. `.query-assistant.toml` in current directory
//! 4. `~/.config/query-assistant/config.toml`
//!
//! Logging is controlled by `QUERY_ASSISTANT_LOG` (`EnvFilter` syntax).
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Runtime error, or medium-severity audit alerts
//! - `2` - SQL rejected by `check`, or high/critical audit alerts

use std::process;

use clap::Parser;
use query_assistant::{app, cli::Cli, config::Config, error::AppResult, logging};
use tokio::main;

#[main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;
    let outcome = app::run(cli, config).await?;
    print!("{}", outcome.output);
    Ok(outcome.exit_code)
}
