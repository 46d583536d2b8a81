//! Command-line interface.
//!
//! `send` pushes one notification to a device (with `--dry-run` to
//! validate and print the outbound message without touching the
//! network); `check` validates a credential file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::client;
use crate::config::Config;
use crate::credentials::{self, ServiceAccount};
use crate::messaging::{
    build_message, validate_device_token, validate_options, validate_payload, NotificationOptions,
    NotificationPayload, Priority,
};

#[derive(Parser)]
#[command(
    name = "fcm-notify",
    version,
    about = "Send push notifications through Firebase Cloud Messaging"
)]
pub struct Cli {
    /// Path to the service-account JSON file
    #[arg(long, global = true, env = "FIREBASE_SERVICE_ACCOUNT_PATH")]
    credentials: Option<PathBuf>,

    /// Name to register the backend handle under
    #[arg(long, global = true, env = "FIREBASE_APP_NAME")]
    app_name: Option<String>,

    /// Alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a notification to a single device
    Send {
        /// Device registration token
        #[arg(long)]
        token: String,

        /// Notification title
        #[arg(long)]
        title: String,

        /// Notification body
        #[arg(long)]
        body: String,

        /// Custom data entry, key=value (repeatable)
        #[arg(long = "data", value_parser = parse_key_val)]
        data: Vec<(String, String)>,

        /// Badge count
        #[arg(long)]
        badge: Option<i64>,

        /// Notification sound
        #[arg(long)]
        sound: Option<String>,

        /// Delivery urgency: high or normal
        #[arg(long)]
        priority: Option<Priority>,

        /// Mark the notification as background-deliverable
        #[arg(long)]
        content_available: bool,

        /// Allow a notification service extension to mutate the payload
        #[arg(long)]
        mutable_content: bool,

        /// Validate and print the outbound message without sending
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a service-account file and report its project
    Check,
}

/// CLI entry point, invoked from `main`.
pub struct CliApp;

impl CliApp {
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        let config = Config::load(cli.config.as_deref())?;

        // Flag and env are folded together by clap; the config file and
        // the built-in default sit below them.
        let credentials_path = cli
            .credentials
            .or_else(|| config.service_account_path.clone())
            .unwrap_or_else(|| PathBuf::from(credentials::DEFAULT_SERVICE_ACCOUNT_PATH));
        let app_name = cli.app_name.or_else(|| config.app_name.clone());

        match cli.command {
            Commands::Check => check(&credentials_path),
            Commands::Send {
                token,
                title,
                body,
                data,
                badge,
                sound,
                priority,
                content_available,
                mutable_content,
                dry_run,
            } => {
                let data: HashMap<String, String> = data.into_iter().collect();
                let mut payload = NotificationPayload::new(title, body);
                if !data.is_empty() {
                    payload = payload.with_data(data);
                }
                let options = NotificationOptions {
                    badge,
                    sound,
                    priority,
                    content_available,
                    mutable_content,
                };

                if dry_run {
                    dry_run_send(&token, &payload, &options)
                } else {
                    send(&credentials_path, app_name, &token, &payload, &options).await
                }
            }
        }
    }
}

fn check(path: &Path) -> Result<()> {
    let account = ServiceAccount::load(path)
        .with_context(|| format!("Credential check failed for {}", path.display()))?;
    println!(
        "Credentials OK: project {} ({})",
        account.project_id, account.client_email
    );
    Ok(())
}

fn dry_run_send(
    token: &str,
    payload: &NotificationPayload,
    options: &NotificationOptions,
) -> Result<()> {
    validate_device_token(token)?;
    validate_payload(payload)?;
    validate_options(options)?;

    let message = build_message(token, payload, options);
    println!("Dry run - would send message:");
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}

async fn send(
    credentials_path: &Path,
    app_name: Option<String>,
    token: &str,
    payload: &NotificationPayload,
    options: &NotificationOptions,
) -> Result<()> {
    let client = client::create_client(credentials_path, app_name)?;
    let result = client.send(token, payload, Some(options)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        anyhow::bail!("Notification was not delivered");
    }
    Ok(())
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid key=value entry: {raw}")),
    }
}
