//! Interactive menu
//!
//! A numbered menu over every catalog, version control and configuration
//! operation. A failed operation is reported and the menu comes back; only a
//! broken terminal ends the loop with an error.

use crate::{
    KbError,
    cli::GitCommands,
    commands,
    config::{self, ConfigProvider, JsonConfigStore, KbConfig},
    vcs::Libgit2Vcs,
};
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::path::{Path, PathBuf};
use tracing::error;

type Result<T> = std::result::Result<T, KbError>;

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    CreateCatalog,
    Scan,
    AddFile,
    ListFiles,
    AttachTag,
    SearchByTag,
    DetachTag,
    RemoveFile,
    ListTags,
    Cleanup,
    GitClone,
    GitAdd,
    GitCommit,
    GitPush,
    Configure,
    ShowConfig,
    Exit,
}

impl MenuItem {
    pub const ALL: [Self; 17] = [
        Self::CreateCatalog,
        Self::Scan,
        Self::AddFile,
        Self::ListFiles,
        Self::AttachTag,
        Self::SearchByTag,
        Self::DetachTag,
        Self::RemoveFile,
        Self::ListTags,
        Self::Cleanup,
        Self::GitClone,
        Self::GitAdd,
        Self::GitCommit,
        Self::GitPush,
        Self::Configure,
        Self::ShowConfig,
        Self::Exit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateCatalog => "Create catalog",
            Self::Scan => "Scan repository for new files",
            Self::AddFile => "Add a file",
            Self::ListFiles => "List files with tags",
            Self::AttachTag => "Tag a file",
            Self::SearchByTag => "Find files by tag",
            Self::DetachTag => "Remove a tag from a file",
            Self::RemoveFile => "Remove a file from the catalog",
            Self::ListTags => "Show all tags",
            Self::Cleanup => "Clean up missing files",
            Self::GitClone => "Git clone",
            Self::GitAdd => "Git add (stage all changes)",
            Self::GitCommit => "Git commit",
            Self::GitPush => "Git push",
            Self::Configure => "Configure",
            Self::ShowConfig => "Show configuration",
            Self::Exit => "Exit",
        }
    }

    /// Whether the item needs a repository directory
    #[must_use]
    pub const fn needs_repository(self) -> bool {
        !matches!(self, Self::Configure | Self::ShowConfig | Self::Exit)
    }
}

/// Run the menu until the user picks Exit or presses Escape
///
/// # Errors
/// Returns an error only if the terminal cannot be read
pub fn run(store: &JsonConfigStore, repo_flag: Option<&Path>, quiet: bool) -> Result<()> {
    let theme = ColorfulTheme::default();
    let labels: Vec<String> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:>2}. {}", i + 1, item.label()))
        .collect();

    loop {
        println!();
        let Some(index) = Select::with_theme(&theme)
            .with_prompt("kbmanager")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };

        let item = MenuItem::ALL[index];
        if item == MenuItem::Exit {
            return Ok(());
        }

        if let Err(e) = dispatch(item, store, repo_flag, quiet, &theme) {
            error!(operation = item.label(), error = %e, "menu operation failed");
            eprintln!("{}", crate::output::failure(&e.to_string()));
        }
    }
}

fn dispatch(
    item: MenuItem,
    store: &JsonConfigStore,
    repo_flag: Option<&Path>,
    quiet: bool,
    theme: &ColorfulTheme,
) -> Result<()> {
    let config = store.read_config()?;
    let quiet = quiet || config.quiet;

    if !item.needs_repository() {
        return match item {
            MenuItem::Configure => {
                config::first_time_setup(store, config)?;
                Ok(())
            }
            MenuItem::ShowConfig => commands::config(store, &crate::cli::ConfigCommands::Show, quiet),
            _ => Ok(()),
        };
    }

    let repo: PathBuf = commands::resolve_repository(repo_flag, &config)?;
    let catalog = commands::open_catalog(&repo, &config);
    let git = Libgit2Vcs::new();

    match item {
        MenuItem::CreateCatalog => commands::init(&catalog, quiet).map(drop),
        MenuItem::Scan => commands::scan(&catalog, quiet).map(drop),
        MenuItem::AddFile => {
            let file = prompt(theme, "File path (relative to the repository)")?;
            commands::add(&catalog, &file, quiet).map(drop)
        }
        MenuItem::ListFiles => commands::list(&catalog, quiet).map(drop),
        MenuItem::AttachTag => {
            let file = prompt(theme, "File path")?;
            let tag = prompt(theme, "Tag")?;
            commands::tag(&catalog, &file, &[tag], quiet).map(drop)
        }
        MenuItem::SearchByTag => {
            let tag = prompt(theme, "Tag")?;
            commands::search(&catalog, &tag, quiet).map(drop)
        }
        MenuItem::DetachTag => {
            let file = prompt(theme, "File path")?;
            let tag = prompt(theme, "Tag")?;
            commands::untag(&catalog, &file, &[tag], quiet).map(drop)
        }
        MenuItem::RemoveFile => {
            let file = prompt(theme, "File path")?;
            commands::rm(&catalog, &file, quiet).map(drop)
        }
        MenuItem::ListTags => commands::tags(&catalog, true, quiet).map(drop),
        MenuItem::Cleanup => commands::cleanup(&catalog, false, false, quiet).map(drop),
        MenuItem::GitClone => commands::git(&git, &config, &repo, &GitCommands::Clone, quiet),
        MenuItem::GitAdd => commands::git(&git, &config, &repo, &GitCommands::Add, quiet),
        MenuItem::GitCommit => {
            let message = prompt(theme, "Commit message")?;
            commands::git(&git, &config, &repo, &GitCommands::Commit { message }, quiet)
        }
        MenuItem::GitPush => commands::git(&git, &config, &repo, &GitCommands::Push, quiet),
        MenuItem::Configure | MenuItem::ShowConfig | MenuItem::Exit => Ok(()),
    }
}

/// Ask for a non-empty line of text
fn prompt(theme: &ColorfulTheme, label: &str) -> Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(label)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Load settings for the menu, offering setup when no repository is known
///
/// # Errors
/// Returns an error if the settings cannot be read or the wizard fails
pub fn ensure_configured(store: &JsonConfigStore, repo_flag: Option<&Path>) -> Result<KbConfig> {
    let config = store.read_config()?;
    if repo_flag.is_some() || config.repository_directory.is_some() {
        return Ok(config);
    }
    println!("No repository is configured yet.");
    Ok(config::first_time_setup(store, config)?)
}
