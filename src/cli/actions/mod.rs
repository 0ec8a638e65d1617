pub mod change_email;
pub mod interactive;
pub mod register;
pub mod resend;
pub mod verify;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Verify(verify::Args),
    Register(register::Args),
    ChangeEmail(change_email::Args),
    Resend(resend::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
