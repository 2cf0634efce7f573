//! Interactive setup wizard
//!
//! Prompts for the repository and commit identity, pre-filled with the
//! current values, and saves the result through a [`ConfigProvider`].

use super::{ConfigProvider, KbConfig, is_valid_email, is_valid_https_remote, is_valid_ssh_remote};
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Walk the user through the settings and save them
///
/// Remote addresses may be left empty. Email and remote addresses are
/// re-prompted until they are valid.
///
/// # Errors
///
/// Returns `ConfigError` if user input cannot be read or the configuration
/// cannot be saved.
pub fn first_time_setup(store: &impl ConfigProvider, current: KbConfig) -> Result<KbConfig, ConfigError> {
    println!("Let's set up kbmanager.\n");

    let theme = ColorfulTheme::default();
    let read_err = |e: dialoguer::Error| ConfigError::Message(format!("Failed to read input: {e}"));

    let default_repo = current
        .repository_directory
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let repository: String = Input::with_theme(&theme)
        .with_prompt("Repository directory")
        .default(default_repo)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("The repository directory cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(read_err)?;

    let user_name: String = Input::with_theme(&theme)
        .with_prompt("Your name")
        .with_initial_text(current.user_name.clone().unwrap_or_default())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("The name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(read_err)?;

    let user_email: String = Input::with_theme(&theme)
        .with_prompt("Your email")
        .with_initial_text(current.user_email.clone().unwrap_or_default())
        .validate_with(|input: &String| -> Result<(), &str> {
            if is_valid_email(input) {
                Ok(())
            } else {
                Err("Enter an address like name@example.com")
            }
        })
        .interact_text()
        .map_err(read_err)?;

    let https: String = Input::with_theme(&theme)
        .with_prompt("HTTPS remote (optional)")
        .with_initial_text(current.remote_address_https.clone().unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() || is_valid_https_remote(input) {
                Ok(())
            } else {
                Err("Expected https://host/owner/repo.git")
            }
        })
        .interact_text()
        .map_err(read_err)?;

    let ssh: String = Input::with_theme(&theme)
        .with_prompt("SSH remote (optional)")
        .with_initial_text(current.remote_address_ssh.clone().unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() || is_valid_ssh_remote(input) {
                Ok(())
            } else {
                Err("Expected git@host:owner/repo.git")
            }
        })
        .interact_text()
        .map_err(read_err)?;

    let non_empty = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };

    let config = KbConfig {
        repository_directory: Some(PathBuf::from(repository.trim())),
        user_name: non_empty(user_name),
        user_email: non_empty(user_email),
        remote_address_https: non_empty(https),
        remote_address_ssh: non_empty(ssh),
        ..current
    };

    store.write_config(&config)?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
