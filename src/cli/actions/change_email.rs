use crate::auth::client;
use crate::cli::actions::interactive;
use crate::cli::commands::api;
use crate::verification::{EmailChangeBackend, SessionOptions};
use anyhow::{anyhow, Result};
use tracing::{info, instrument};

#[derive(Debug)]
pub struct Args {
    pub api: api::Options,
    pub new_email: String,
}

/// Requests the change for the signed-in account and verifies the code sent to
/// the new address.
///
/// # Errors
/// Returns an error if the change request is rejected or the challenge cannot run.
#[instrument(skip_all, fields(new_email = %args.new_email))]
pub async fn execute(args: Args) -> Result<()> {
    let api_client = args.api.client()?;

    client::request_email_change(&api_client, &args.new_email)
        .await
        .map_err(|err| anyhow!(err.user_message("Failed to request email change")))?;

    info!("email change requested");
    println!("Verification code sent to {}", args.new_email);

    let options = SessionOptions {
        redirect_delay: args.api.redirect_delay,
        ..SessionOptions::default()
    };
    interactive::run(&args.new_email, EmailChangeBackend::new(api_client), options).await?;
    Ok(())
}
