//! Operator CLI for the estate API store.
//!
//! No HTTP route manages credential records; provisioning happens here,
//! directly against the configured store.

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "estate_admin", about = "Operator tooling for the estate API store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand, about = "Manage credential records")]
    User(commands::user::UserCommands),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::User(cmd) => commands::user::handle(cmd).await,
    }
}
