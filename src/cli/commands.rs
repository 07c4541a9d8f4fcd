//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canvas LMS API client
#[derive(Parser, Debug)]
#[command(name = "canvas-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API host, overrides config file and CANVAS_API_HOST
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Bearer token, overrides config file and CANVAS_API_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a GET request and print the response body
    Get {
        /// Resource path under /api/v1, e.g. users/self
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// Fetch a paginated list
    List {
        /// Resource path under /api/v1, e.g. courses
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Follow `next` links until the last page
        #[arg(long)]
        all: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse a `key=value` argument
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("include[]=term").unwrap(),
            ("include[]".to_string(), "term".to_string())
        );
        assert_eq!(
            parse_key_value("search_term=a=b").unwrap(),
            ("search_term".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "canvas-api",
            "--host",
            "school.instructure.com",
            "list",
            "courses",
            "-q",
            "per_page=50",
            "--all",
        ])
        .unwrap();

        assert_eq!(cli.host.as_deref(), Some("school.instructure.com"));
        match cli.command {
            Commands::List { path, query, all } => {
                assert_eq!(path, "courses");
                assert_eq!(query, vec![("per_page".to_string(), "50".to_string())]);
                assert!(all);
            }
            Commands::Get { .. } => panic!("Expected list command"),
        }
    }
}
