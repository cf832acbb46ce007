//! Confirmation gate shown before anything is sent to the account.

use dialoguer::Input;

/// Prompt shown before the import starts
pub const CONFIRMATION_PROMPT: &str = "Do you want to import your data into Google Ads ? [Y/N]";

/// Answer to the confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Decline,
    Invalid,
}

/// Classify a raw answer; only a bare `Y`/`y` or `N`/`n` is accepted
pub fn parse_confirmation(answer: &str) -> Confirmation {
    match answer {
        "Y" | "y" => Confirmation::Proceed,
        "N" | "n" => Confirmation::Decline,
        _ => Confirmation::Invalid,
    }
}

/// Ask on the terminal
pub fn ask_confirmation() -> anyhow::Result<Confirmation> {
    let answer: String = Input::new()
        .with_prompt(CONFIRMATION_PROMPT)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| {
            anyhow::anyhow!(
                "Cannot read the confirmation ({}). Run in a terminal or pass --yes",
                e
            )
        })?;
    Ok(parse_confirmation(&answer))
}
