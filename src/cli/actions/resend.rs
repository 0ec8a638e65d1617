use crate::auth::client;
use crate::cli::commands::api;
use crate::verification::controller::RESEND_FALLBACK_MESSAGE;
use crate::verification::session::RESENT_NOTIFICATION;
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub struct Args {
    pub api: api::Options,
    pub email: String,
}

/// One-shot resend outside an interactive challenge. The backend applies its
/// own throttling; there is no local cooldown to honor here.
///
/// # Errors
/// Returns an error carrying the backend message when the resend fails.
pub async fn execute(args: Args) -> Result<()> {
    let api_client = args.api.client()?;

    client::resend_code(&api_client, &args.email)
        .await
        .map_err(|err| anyhow!(err.user_message(RESEND_FALLBACK_MESSAGE)))?;

    println!("{RESENT_NOTIFICATION}");
    Ok(())
}
