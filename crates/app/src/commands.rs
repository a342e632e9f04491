//! Command dispatch.

use anyhow::{Result, bail};
use stratus_application::{GuardOutcome, RegisterInput};
use stratus_infrastructure::ClientConfig;
use stratus_infrastructure::config::{ENV_API_URL, ENV_STORAGE_PATH};
use tracing::debug;

use crate::app::App;
use crate::cli::{Cli, Command, GlobalArgs};

/// Resolves configuration, flags taking precedence over the environment.
///
/// # Errors
///
/// Returns an error if a setting holds an invalid value.
pub fn load_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let config = ClientConfig::from_lookup(|key| match key {
        ENV_API_URL => global.api_url.clone(),
        ENV_STORAGE_PATH => global.storage_path.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

/// Runs one command to completion.
///
/// # Errors
///
/// Returns an error if the command fails.
#[allow(clippy::print_stdout)]
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.global)?;
    debug!(
        api = %config.api_base_url,
        storage = %config.storage_path.display(),
        "configuration loaded"
    );
    let app = App::start(&config).await?;

    match cli.command {
        Command::Login { username, password } => {
            let output = app.login(&username, &password).await?;
            match output.user {
                Some(user) => println!(
                    "signed in as {} ({})",
                    user.username.as_deref().unwrap_or(&username),
                    user.role.as_str()
                ),
                None => println!("signed in as {username}"),
            }
        }
        Command::Register {
            username,
            password,
            email,
            phone,
        } => {
            let message = app
                .register(RegisterInput {
                    username,
                    password,
                    email,
                    phone,
                })
                .await?;
            println!("{message}");
        }
        Command::Logout => {
            app.logout().await?;
            println!("signed out");
        }
        Command::Status => println!("{}", app.status()),
        Command::Open { path } => match app.open(&path).await? {
            GuardOutcome::Allowed(_) => println!("{}", app.location()),
            GuardOutcome::Redirected(target) => println!("redirected to {target}"),
        },
        Command::Get { path, headers } => {
            let response = app.get(&path, &headers).await?;
            if !response.is_success() {
                let message = response
                    .error_message()
                    .unwrap_or_else(|| response.text().into_owned());
                bail!("request failed with status {}: {message}", response.status);
            }
            println!("{}", response.text());
        }
    }

    Ok(())
}
