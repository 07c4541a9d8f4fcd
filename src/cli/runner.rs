//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::http::Client;
use crate::request::RawRequest;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let client = Client::new(self.load_config()?).context("failed to create API client")?;

        match &self.cli.command {
            Commands::Get { path, query } => self.get(&client, path, query),
            Commands::List { path, query, all } => self.list(&client, path, query, *all),
        }
    }

    /// Resolve the client config: file, then environment, then flags
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ClientConfig::default(),
        };

        config.apply_env();

        if let Some(host) = &self.cli.host {
            config.host.clone_from(host);
        }
        if let Some(token) = &self.cli.token {
            config.token.clone_from(token);
        }

        Ok(config)
    }

    fn get(&self, client: &Client, path: &str, query: &[(String, String)]) -> Result<()> {
        let request = build_request(path, query);
        let body: Value = client
            .send_json(&request)
            .with_context(|| format!("GET {path} failed"))?;
        self.output(&body)
    }

    fn list(&self, client: &Client, path: &str, query: &[(String, String)], all: bool) -> Result<()> {
        let request = build_request(path, query);

        if all {
            let items: Vec<Value> = client
                .collect_all(&request)
                .with_context(|| format!("listing {path} failed"))?;
            info!("Fetched {} items from {}", items.len(), path);
            return self.output(&Value::Array(items));
        }

        let page = client
            .send_paged::<Value, _>(&request)
            .with_context(|| format!("listing {path} failed"))?;
        eprintln!("{}", page.links);
        self.output(&Value::Array(page.items))
    }

    /// Write a JSON value to stdout
    fn output(&self, value: &Value) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn build_request(path: &str, query: &[(String, String)]) -> RawRequest {
    query
        .iter()
        .fold(RawRequest::get(path), |req, (k, v)| req.with_query(k, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestDescriptor;
    use clap::Parser;

    #[test]
    fn test_build_request_from_args() {
        let req = build_request(
            "courses",
            &[
                ("per_page".to_string(), "10".to_string()),
                ("include[]".to_string(), "term".to_string()),
            ],
        );

        assert_eq!(req.url_path(), "courses");
        assert_eq!(
            RequestDescriptor::query(&req).unwrap(),
            "per_page=10&include%5B%5D=term"
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"host: from-file.example\ntoken: file-token\n")
            .unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "canvas-api",
            "--config",
            config_path.as_str(),
            "--token",
            "flag-token",
            "get",
            "users/self",
        ])
        .unwrap();

        let config = Runner::new(cli).load_config().unwrap();
        assert_eq!(config.token, "flag-token");
    }
}
