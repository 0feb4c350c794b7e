//! `contractorcli` entry point.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use cinp::{Client, Transport};
use clap::Parser;
use colored::Colorize;
use contractor::Contractor;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use contractor_cli::config::Settings;
use contractor_cli::output::Renderer;
use contractor_cli::{dispatch, Cli, Context};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info,contractor=debug,contractor_cli=debug,cinp=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let base_url = settings.base_url();
    debug!(url = %base_url, "Connecting");

    let mut client = Client::new(&base_url, &settings.client_options())
        .with_context(|| format!("Unable to create a client for {base_url}"))?;

    let logged_in = match settings.username.as_deref() {
        Some(username) if !username.is_empty() => {
            let password = settings.password.as_deref().unwrap_or_default();
            client.login(username, password).await?;
            true
        }
        _ => false,
    };

    let client = Arc::new(client);
    let transport: Arc<dyn Transport> = Arc::clone(&client) as Arc<dyn Transport>;
    let ctx = Context::new(Contractor::new(transport), Renderer::new(cli.json)?);

    let result = dispatch(cli.command, &ctx).await;

    if logged_in {
        if let Err(e) = client.logout().await {
            warn!(error = %e, "Logout failed");
        }
    }

    println!("{}", result?);
    Ok(())
}
