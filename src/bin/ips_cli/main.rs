//! ips-cli: command-line client for the Invision Community REST API
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

#[cfg(test)]
mod tests;

use clap::Parser;
use ips_rest::Client;
use ips_rest::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, settings_from_cli};
use handlers::{events, members, posts, records, topics};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = settings_from_cli(&cli)?;
    telemetry::init(&settings.logging)?;
    let client = Client::from_settings(&settings.client)?;

    match cli.command {
        Commands::Hello => handlers::hello(&client).await?,
        Commands::Members(cmd) => members::handle(&client, cmd.action).await?,
        Commands::Topics(cmd) => topics::handle(&client, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&client, cmd.action).await?,
        Commands::Records(cmd) => records::handle(&client, cmd.action).await?,
        Commands::Events(cmd) => events::handle(&client, cmd.action).await?,
    }

    Ok(())
}
