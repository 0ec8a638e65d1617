use crate::cli::actions::interactive;
use crate::cli::commands::api;
use crate::verification::{RegistrationBackend, SessionOptions};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub api: api::Options,
    pub email: String,
}

/// Runs the interactive challenge for a code mailed after registration.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or stdin fails.
pub async fn execute(args: Args) -> Result<()> {
    let backend = RegistrationBackend::new(args.api.client()?);
    let options = SessionOptions {
        redirect_delay: args.api.redirect_delay,
        ..SessionOptions::default()
    };

    interactive::run(&args.email, backend, options).await?;
    Ok(())
}
