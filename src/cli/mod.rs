pub mod client;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;

use client::{ApiClient, ClientError};
use config::{SessionConfig, DEFAULT_SERVER};
use utils::{output_error, output_success, output_users};

#[derive(Parser)]
#[command(name = "passgate")]
#[command(about = "Passgate CLI - sign up, sign in and inspect sessions against a passgate server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "PASSGATE_SERVER", help = "Server URL (defaults to the last server used)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Register a new user")]
    Signup {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "PASSGATE_PASSWORD", help = "Password")]
        password: String,
    },

    #[command(about = "Sign in and store the session token")]
    Signin {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "PASSGATE_PASSWORD", help = "Password")]
        password: String,
    },

    #[command(about = "Show the user behind the stored token")]
    Me,

    #[command(about = "List registered users (development servers only)")]
    Users,

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show server health and local session state")]
    Status,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = execute(cli, &output_format).await;

    // Report every failure once, in the requested format
    if let Err(e) = &result {
        match e.downcast_ref::<ClientError>() {
            Some(ClientError::Api { status, message }) => {
                output_error(&output_format, message, Some(status.as_str()))?
            }
            _ => output_error(&output_format, &e.to_string(), None)?,
        }
    }

    result
}

async fn execute(cli: Cli, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut session = config::load_session()?;

    let server = cli
        .server
        .or_else(|| session.server.clone())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let client = ApiClient::new(&server)?;

    match cli.command {
        Commands::Signup { username, password } => {
            let response = client.signup(&username, &password).await?;
            output_success(output_format, &response.message, Some(json!({ "username": username })))
        }
        Commands::Signin { username, password } => {
            let response = client.signin(&username, &password).await?;
            session.signed_in(&server, &username, response.token);
            config::save_session(&session)?;
            output_success(output_format, &response.message, Some(json!({ "username": username })))
        }
        Commands::Me => {
            let token = stored_token(&session)?;
            let me = client.me(&token).await?;
            output_success(
                output_format,
                &format!("Signed in as {}", me.username),
                Some(json!({ "username": me.username })),
            )
        }
        Commands::Users => {
            let users = client.users().await?;
            output_users(output_format, &users)
        }
        Commands::Logout => {
            let had_token = session.sign_out();
            config::save_session(&session)?;
            let message = if had_token { "Signed out" } else { "No stored session" };
            output_success(output_format, message, None)
        }
        Commands::Status => status(&client, &server, &session, output_format).await,
    }
}

fn stored_token(session: &SessionConfig) -> anyhow::Result<String> {
    session
        .token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Not signed in; run `passgate signin <username>` first"))
}

async fn status(
    client: &ApiClient,
    server: &str,
    session: &SessionConfig,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let health = client.health().await.ok();
    let server_up = health.is_some();

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "server": server,
                    "server_up": server_up,
                    "health": health,
                    "username": session.username,
                    "signed_in_at": session.signed_in_at,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Server: {} ({})", server, if server_up { "up" } else { "down" });
            match (&session.username, &session.signed_in_at) {
                (Some(username), Some(at)) => println!("Session: {} (signed in {})", username, at),
                _ => println!("Session: none"),
            }
        }
    }
    Ok(())
}
