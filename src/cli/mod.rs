//! Command-line front end for account administration
//!
//! Every command runs against PostgreSQL; `migrate` creates the schema.
//! Results are printed to stdout as JSON.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::domain::account::{AccountForm, AccountId};
use crate::domain::post::{NewPost, PostRepository};
use crate::infrastructure::storage::{run_migrations, PostgresStore};
use crate::{connect_store, create_account_service, AppConfig};

/// Micropost accounts - manage sample-app accounts and their posts
#[derive(Parser)]
#[command(name = "micropost-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or upgrade the database schema
    Migrate,

    /// Register a new account
    Create(CreateArgs),

    /// Check an email/password pair
    Authenticate {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Grant or revoke admin rights
    ToggleAdmin { id: i64 },

    /// Publish a post for an account
    Post { id: i64, content: String },

    /// Show an account's posts, newest first
    Feed { id: i64 },

    /// Delete an account and all of its posts
    Delete { id: i64 },
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub password_confirmation: String,
    #[arg(long)]
    pub admin: bool,
}

impl From<CreateArgs> for AccountForm {
    fn from(args: CreateArgs) -> Self {
        AccountForm::new(args.name, args.email, args.password, args.password_confirmation)
            .with_admin(args.admin)
    }
}

/// Execute a parsed command
pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let store = connect_store(config).await?;

    match cli.command {
        Command::Migrate => {
            let applied = run_migrations(store.pool()).await?;
            info!("Applied {} migration(s)", applied);
            print_json(&serde_json::json!({ "applied": applied }))
        }
        command => run_account_command(command, store, config).await,
    }
}

async fn run_account_command(
    command: Command,
    store: PostgresStore,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let service = create_account_service(store.clone(), config);

    match command {
        Command::Create(args) => {
            let account = service.create(args.into()).await?;
            print_json(&account)
        }
        Command::Authenticate { email, password } => {
            match service.authenticate_email(&email, &password).await? {
                Some(account) => print_json(&account),
                None => anyhow::bail!("Invalid email/password combination"),
            }
        }
        Command::ToggleAdmin { id } => {
            let account = service.toggle_admin(AccountId::new(id)).await?;
            print_json(&account)
        }
        Command::Post { id, content } => {
            let post = PostRepository::create(&store, NewPost::new(AccountId::new(id), content)).await?;
            print_json(&post)
        }
        Command::Feed { id } => {
            let account = service
                .get(AccountId::new(id))
                .await?
                .ok_or_else(|| anyhow::anyhow!("Account '{}' not found", id))?;
            print_json(&service.feed(&account).await?)
        }
        Command::Delete { id } => {
            let deleted = service.delete(AccountId::new(id)).await?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        Command::Migrate => run_migrations(store.pool())
            .await
            .map(|_| ())
            .map_err(Into::into),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "micropost-accounts",
            "create",
            "--name",
            "Example User",
            "--email",
            "user@example.com",
            "--password",
            "foobar",
            "--password-confirmation",
            "foobar",
            "--admin",
        ])
        .unwrap();

        let Command::Create(args) = cli.command else {
            panic!("expected create command");
        };
        let form = AccountForm::from(args);
        assert_eq!(form.name, "Example User");
        assert_eq!(form.password_confirmation, "foobar");
        assert!(form.admin);
    }

    #[test]
    fn test_parse_feed() {
        let cli = Cli::try_parse_from(["micropost-accounts", "feed", "7"]).unwrap();
        assert!(matches!(cli.command, Command::Feed { id: 7 }));
    }

    #[test]
    fn test_create_requires_confirmation() {
        let result = Cli::try_parse_from([
            "micropost-accounts",
            "create",
            "--name",
            "Example",
            "--email",
            "user@example.com",
            "--password",
            "foobar",
        ]);
        assert!(result.is_err());
    }
}
