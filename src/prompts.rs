//! Interactive confirmation for destructive operations

use dialoguer::Select;

use crate::error::{Error, Result};

/// Arrow-key navigable yes/no confirmation.
///
/// The terminal read is blocking, so it runs on the blocking thread
/// pool rather than stalling the async runtime.
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection
///
/// # Returns
/// * `Ok(true)` if the user selects "Yes"
/// * `Ok(false)` if the user selects "No"
pub async fn confirm(prompt: &str, default_yes: bool) -> Result<bool> {
    let prompt = prompt.to_string();
    let default_index = if default_yes { 0 } else { 1 };

    let selection = tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&["Yes", "No"])
            .default(default_index)
            .interact()
    })
    .await
    .map_err(|e| Error::Prompt(dialoguer::Error::IO(std::io::Error::other(e))))??;

    Ok(selection == 0)
}
