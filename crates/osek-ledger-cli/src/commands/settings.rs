use clap::Args;
use serde_json::Value;
use std::path::Path;

use osek_ledger_core::settings::Settings;

use crate::commands::Context;
use crate::input;

/// Arguments for showing or replacing the settings block
#[derive(Args)]
pub struct SettingsArgs {
    /// Replace the settings from a JSON file ("-" reads stdin); omitted fields take defaults
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_settings(
    ctx: &Context,
    args: SettingsArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut state = ctx.load()?;

    if let Some(ref source) = args.input {
        let settings: Settings = if source == "-" {
            input::stdin::read_stdin()?.ok_or("No settings JSON piped on stdin")?
        } else {
            input::file::read_json(Path::new(source))?
        };
        settings.rates.validate()?;
        state.settings = settings;
        ctx.store.save(&mut state)?;
        log::info!("Settings replaced from {}", source);
    }

    Ok(serde_json::to_value(&state.settings)?)
}
