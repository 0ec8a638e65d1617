use crate::auth::client;
use crate::cli::actions::interactive;
use crate::cli::commands::api;
use crate::verification::{RegistrationBackend, SessionOptions};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::{info, instrument};

#[derive(Debug)]
pub struct Args {
    pub api: api::Options,
    pub email: String,
    pub password: SecretString,
    pub display_name: Option<String>,
}

/// Creates the account, then hands over to the verification challenge for the
/// code the backend just mailed.
///
/// # Errors
/// Returns an error if registration is rejected or the challenge cannot run.
#[instrument(skip_all, fields(email = %args.email))]
pub async fn execute(args: Args) -> Result<()> {
    let api_client = args.api.client()?;

    let response = client::register(
        &api_client,
        &args.email,
        &args.password,
        args.display_name.as_deref(),
    )
    .await
    .map_err(|err| anyhow!(err.user_message("Registration failed")))?;

    info!("account registered");
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Registration successful. Check your email for a verification code.")
    );

    let options = SessionOptions {
        redirect_delay: args.api.redirect_delay,
        ..SessionOptions::default()
    };
    interactive::run(&args.email, RegistrationBackend::new(api_client), options).await?;
    Ok(())
}
