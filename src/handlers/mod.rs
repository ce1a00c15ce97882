//! Command handler modules
//!
//! One module per CLI command. Handlers load the scene document, apply
//! settings, call into [`crate::batch`] and print the outcome.

pub mod export;
pub mod show;
pub mod status;
pub mod sync;

pub use export::handle_export;
pub use show::handle_show;
pub use status::handle_status;
pub use sync::handle_sync;

use anyhow::{Context, Result};
use inquire::Confirm;

/// Whether we can prompt the user
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Ask before overwriting `what`. Always true when not interactive.
pub(crate) fn confirm_overwrite(what: &str, help: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(true);
    }

    Confirm::new(&format!("Overwrite {what}?"))
        .with_default(true)
        .with_help_message(help)
        .prompt()
        .context("Failed to get confirmation")
}
