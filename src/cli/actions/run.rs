use crate::cli::actions::{change_email, register, resend, verify, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Verify(args) => verify::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::ChangeEmail(args) => change_email::execute(args).await,
        Action::Resend(args) => resend::execute(args).await,
    }
}
