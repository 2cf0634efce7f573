//! Config command - show and edit settings

use crate::{
    KbError,
    cli::{ConfigCommands, parse_setting},
    config::{ConfigProvider, JsonConfigStore, KEYS},
    output,
};

type Result<T> = std::result::Result<T, KbError>;

/// Execute a config subcommand against `store`
///
/// # Errors
/// Returns an error for unknown keys, invalid values, or if the config file
/// cannot be read or written
pub fn execute(store: &JsonConfigStore, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = store.read_config()?;
            for key in KEYS {
                let value = config.get(key).unwrap_or_default();
                if quiet {
                    println!("{key}={value}");
                } else {
                    println!("  {key:<22} {value}");
                }
            }
        }
        ConfigCommands::Path => {
            println!("{}", store.path().display());
        }
        ConfigCommands::Get { key } => {
            let config = store.read_config()?;
            let value = config.get(key.trim()).ok_or_else(|| unknown_key(key))?;
            println!("{value}");
        }
        ConfigCommands::Set { setting } => {
            let (key, value) = parse_setting(setting).map_err(KbError::InvalidInput)?;
            if !KEYS.contains(&key) {
                return Err(unknown_key(key));
            }

            let mut config = store.read_config()?;
            config.set(key, value)?;
            store.write_config(&config)?;

            if !quiet {
                let shown = config.get(key).unwrap_or_default();
                println!("{}", output::success(&format!("Set {key} = {shown}")));
            }
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> KbError {
    KbError::InvalidInput(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        KEYS.join(", ")
    ))
}
