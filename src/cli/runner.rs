//! CLI runner - executes commands

use crate::auth::UserCredentials;
use crate::cli::commands::{Cli, Commands};
use crate::client::{BeaconApi, Client};
use crate::config::ClientConfig;
use crate::http::RequestOptions;
use anyhow::Context;
use futures::StreamExt;
use std::io::Write;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> anyhow::Result<()> {
        let client = self.login().await?;

        match &self.cli.command {
            Commands::Login => self.report_login(&client).await,
            Commands::Get {
                path,
                query,
                header,
            } => self.get(&client, path, query, header).await,
            Commands::Pages {
                path,
                query,
                page_size,
                count_only,
            } => {
                self.pages(&client, path, query, *page_size, *count_only)
                    .await
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ClientConfig::from_env().context("failed to read client configuration")?,
        };
        if let Some(env) = self.cli.env {
            config.environment = env;
        }
        Ok(config)
    }

    async fn login(&self) -> anyhow::Result<Client> {
        let config = self.load_config()?;
        let environment = config.environment;
        let api = BeaconApi::from_config(config)?;
        let credentials = UserCredentials::from_env().context("failed to read user credentials")?;

        api.login_with(&credentials)
            .await
            .with_context(|| format!("login to {environment} failed"))
    }

    async fn report_login(&self, client: &Client) -> anyhow::Result<()> {
        let credential = client.credentials().current_credential().await?;
        println!("Logged in to {}", credential.environment());
        println!("  client:  {}", credential.client_id());
        println!("  issued:  {}", credential.issued_at().to_rfc3339());
        if let Some(expires) = credential.expires_at() {
            println!("  expires: {}", expires.to_rfc3339());
        }
        Ok(())
    }

    async fn get(
        &self,
        client: &Client,
        path: &str,
        query: &[(String, String)],
        header: &[(String, String)],
    ) -> anyhow::Result<()> {
        let mut options = build_options(query);
        for (key, value) in header {
            options = options.header(key, value.as_str());
        }

        let body = client.get(path, &options).await?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok(())
    }

    async fn pages(
        &self,
        client: &Client,
        path: &str,
        query: &[(String, String)],
        page_size: Option<u32>,
        count_only: bool,
    ) -> anyhow::Result<()> {
        let mut client = client.clone();
        if let Some(size) = page_size {
            let pagination = client.pagination().clone().with_page_size(size);
            client = client.with_pagination(pagination);
        }

        let mut stream = Box::pin(client.page_stream(path, build_options(query)));
        let mut pages = 0usize;
        let mut records = 0usize;

        while let Some(page) = stream.next().await {
            let page = page.with_context(|| format!("paging {path} failed after {records} records"))?;
            pages += 1;
            records += page.len();
            if !count_only {
                let mut out = std::io::stdout().lock();
                for record in &page.records {
                    writeln!(out, "{}", serde_json::to_string(record)?)?;
                }
            }
        }

        if self.cli.verbose || count_only {
            eprintln!("{records} records in {pages} pages");
        }
        Ok(())
    }
}

fn build_options(query: &[(String, String)]) -> RequestOptions {
    query
        .iter()
        .fold(RequestOptions::new(), |options, (key, value)| {
            options.query(key, value.as_str())
        })
}
