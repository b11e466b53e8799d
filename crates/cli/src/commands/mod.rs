//! CLI entry point, startup dialogue and the interactive shell
//!
//! `execute` loads the configuration, asks for credentials and a region,
//! connects, lets the operator pick a bucket and then hands over to the
//! [`Shell`] command loop. Every storage operation is reached through the
//! menu; the flags below only tune the connection and the output.

use std::io::{IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use s3i_core::{Config, ConfigManager, Profile, Session};
use s3i_s3::S3Client;
use tokio::io::AsyncBufRead;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod buckets;
mod files;
pub mod menu;
pub mod prompt;
mod relocate;
mod security;
mod shell;

pub use menu::MenuChoice;
pub use prompt::Prompter;
pub use shell::{Flow, InputClosed, Shell};

/// s3interact - interactive S3 object storage client
///
/// Manage buckets, folders, files, policies and ACLs from a numbered menu.
/// Works with AWS S3 and other S3-compatible services.
#[derive(Parser, Debug)]
#[command(name = "s3interact")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Custom S3-compatible endpoint URL
    #[arg(long, env = "S3INTERACT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Region used when the region prompt is left blank
    #[arg(long)]
    pub region: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, default_value = "false")]
    pub path_style: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Run the interactive session and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(e) => {
            let mut formatter = Formatter::new(
                OutputConfig::resolve(cli.no_color, true, "auto", false),
                std::io::stdout(),
            );
            formatter.error(&format!("Failed to load configuration: {e}"));
            return ExitCode::UsageError;
        }
    };

    let output_config = OutputConfig::resolve(
        cli.no_color,
        cli.no_progress,
        &config.defaults.color,
        config.defaults.progress,
    );
    let mut formatter = Formatter::new(output_config, std::io::stdout());

    let profile = match base_profile(&cli, &config) {
        Ok(profile) => profile,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::UsageError;
        }
    };

    let mut input = Prompter::new(tokio::io::BufReader::new(tokio::io::stdin()));
    let hidden = std::io::stdin().is_terminal();

    let session = match connect(profile, &mut input, &mut formatter, hidden).await {
        Ok(Some(session)) => session,
        Ok(None) => return ExitCode::Success,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::GeneralError;
        }
    };

    let mut shell = Shell::new(session, input, formatter);
    if shell.choose_bucket().await.is_err() {
        return ExitCode::Success;
    }
    shell.run().await
}

/// Connection settings from the config file with command-line overrides
pub fn base_profile(cli: &Cli, config: &Config) -> anyhow::Result<Profile> {
    let mut profile = Profile::from_config(config);

    if let Some(region) = cli.region.as_deref() {
        profile = profile.in_region(region).context("Invalid --region")?;
    }

    if let Some(endpoint) = cli.endpoint.as_deref() {
        profile = profile
            .with_endpoint(endpoint)
            .with_context(|| format!("Invalid endpoint URL '{endpoint}'"))?;
    }

    if cli.path_style {
        profile.force_path_style = true;
    }

    Ok(profile)
}

/// Ask for credentials and region; `None` when input ended first
///
/// A blank key ID keeps the SDK's default credential chain. With `hidden`
/// the secret is read from the terminal without echo.
pub async fn prompt_profile<R, W>(
    profile: Profile,
    input: &mut Prompter<R>,
    out: &mut Formatter<W>,
    hidden: bool,
) -> anyhow::Result<Option<Profile>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    out.prompt("Enter AWS Key ID: ");
    let Some(key_id) = input.next_line().await else {
        return Ok(None);
    };

    let mut profile = profile;
    if key_id.trim().is_empty() {
        tracing::debug!("no key ID given, using the default credential chain");
    } else {
        out.prompt("Enter AWS Secret Key: ");
        let secret = if hidden {
            tokio::task::spawn_blocking(|| console::Term::stdout().read_secure_line())
                .await
                .context("Secret key prompt failed")?
                .context("Could not read the secret key")?
        } else {
            let Some(secret) = input.next_line().await else {
                return Ok(None);
            };
            secret
        };
        profile = profile.with_credentials(&key_id, &secret);
    }

    out.prompt("Enter AWS Region (e.g., eu-west-2): ");
    let Some(region) = input.next_line().await else {
        return Ok(None);
    };
    if !region.trim().is_empty() {
        profile = profile.in_region(&region)?;
    }

    Ok(Some(profile))
}

async fn connect<R, W>(
    profile: Profile,
    input: &mut Prompter<R>,
    out: &mut Formatter<W>,
    hidden: bool,
) -> anyhow::Result<Option<Session>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(profile) = prompt_profile(profile, input, out, hidden).await? else {
        return Ok(None);
    };

    let region = profile.region.clone();
    let client = S3Client::new(profile)
        .await
        .with_context(|| format!("Error creating session in region '{region}'"))?;
    tracing::debug!(%region, "connected");

    Ok(Some(Session::new(Box::new(client))))
}
