/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: API keys typed at the terminal
[POS]:    CLI interactive flow
[UPDATE]: When key prompts change
*/

use anyhow::Result;
use console::style;
use dialoguer::{Password, theme::ColorfulTheme};
use lifx_demo_adapter::ApiKeys;
use lifx_demo_adapter::keys::{validate_claude_api_key, validate_lifx_api_key};

/// Ask for both keys, keeping `current` when the answer is left empty
pub fn prompt_api_keys(current: &ApiKeys) -> Result<ApiKeys> {
    let theme = ColorfulTheme::default();
    println!("{}", style("Enter API keys (leave empty to keep the stored value)").dim());

    let lifx: String = Password::with_theme(&theme)
        .with_prompt("LIFX API key")
        .allow_empty_password(true)
        .interact()?;
    if !lifx.is_empty() {
        validate_lifx_api_key(&lifx)?;
    }

    let claude: String = Password::with_theme(&theme)
        .with_prompt("Claude API key")
        .allow_empty_password(true)
        .interact()?;
    if !claude.is_empty() {
        validate_claude_api_key(&claude)?;
    }

    Ok(merge_keys(current, Some(lifx), Some(claude)))
}

/// Apply non-empty replacements on top of `current`
pub fn merge_keys(current: &ApiKeys, lifx: Option<String>, claude: Option<String>) -> ApiKeys {
    ApiKeys {
        lifx: lifx.filter(|k| !k.is_empty()).unwrap_or_else(|| current.lifx.clone()),
        claude: claude
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| current.claude.clone()),
    }
}
