use clap::Subcommand;

use crate::config;
use crate::store::models::user::User;
use crate::store::{self, Store, StoreError};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password for the new user")]
        password: String,
    },

    #[command(about = "List users")]
    List,

    #[command(about = "Remove a user")]
    Remove {
        #[arg(help = "Username")]
        username: String,
    },
}

pub async fn handle(cmd: UserCommands) -> anyhow::Result<()> {
    let config = config::config();

    // The in-memory fallback store would vanish with this process; user
    // provisioning only makes sense against the shared store.
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL is not set; user records live in the Postgres store");
    }

    let store = store::from_config(&config.database).await?;

    match cmd {
        UserCommands::Add { username, password } => add(store.as_ref(), &username, &password).await,
        UserCommands::List => list(store.as_ref()).await,
        UserCommands::Remove { username } => remove(store.as_ref(), &username).await,
    }
}

async fn add(store: &dyn Store, username: &str, password: &str) -> anyhow::Result<()> {
    match store.insert_user(User::create(username, password)).await {
        Ok(()) => {
            println!("Created user '{username}'");
            Ok(())
        }
        Err(StoreError::Conflict(_)) => anyhow::bail!("user '{username}' already exists"),
        Err(e) => Err(e.into()),
    }
}

async fn list(store: &dyn Store) -> anyhow::Result<()> {
    for user in store.list_users().await? {
        println!(
            "{}\t{}",
            user.username,
            user.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

async fn remove(store: &dyn Store, username: &str) -> anyhow::Result<()> {
    if store.delete_user(username).await? {
        println!("Removed user '{username}'");
        Ok(())
    } else {
        anyhow::bail!("no such user '{username}'")
    }
}
