#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod render;

use args::{Args, Command};
use clap::Parser;
use cps_client::CpsClient;
use cps_config::{AccountConfig, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if args.command.needs_config() || args.config.exists() {
        Some(Config::load(&args.config)?)
    } else {
        None
    };

    let telemetry = config.as_ref().map(|c| c.telemetry.clone()).unwrap_or_default();
    cps_telemetry::init(&telemetry)?;

    match args.command {
        Command::Explain { code } => println!("{}", render::explain(code)),
        Command::Classify { status, body } => {
            println!("{}", render::classify_response(status, body.as_deref()));
        }
        Command::Login => {
            let (client, account) = connect(config)?;
            let Some((email, password)) = account.credentials() else {
                anyhow::bail!("login requires account.email and account.password");
            };

            let session = client.login(email, password).await.map_err(report)?;
            println!("signed in as {}", session.user_id.as_deref().unwrap_or(email));
        }
        Command::Devices => {
            let (client, account) = connect(config)?;
            if !client.is_authorized()
                && let Some((email, password)) = account.credentials()
            {
                client.login(email, password).await.map_err(report)?;
            }

            for device in client.list_devices().await.map_err(report)? {
                println!("{}", render::device_line(&device));
            }
        }
    }

    Ok(())
}

/// Build a client from the loaded configuration, seeded with the account token
fn connect(config: Option<Config>) -> anyhow::Result<(CpsClient, AccountConfig)> {
    let Some(config) = config else {
        anyhow::bail!("no configuration loaded");
    };
    let Some(account) = config.account else {
        anyhow::bail!("the [account] section is required for this command");
    };

    let mut client = CpsClient::from_config(&config.api)?;
    if let Some(token) = account.token() {
        client = client.with_token(token.clone());
    }

    tracing::debug!(base_url = %config.api.base_url, "client ready");
    Ok((client, account))
}

fn report(error: cps_client::ClientError) -> anyhow::Error {
    match error.cps() {
        Some(cps) => anyhow::anyhow!(render::describe(cps)),
        None => error.into(),
    }
}
