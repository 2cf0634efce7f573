//! Git command - sync the repository with its remote

use crate::{
    KbError,
    cli::GitCommands,
    config::KbConfig,
    output,
    vcs::{CommitOutcome, Signature, VcsError, VersionControl},
};
use std::path::Path;
use tracing::warn;

type Result<T> = std::result::Result<T, KbError>;

/// Execute a git subcommand for the repository at `repo`
///
/// Cloning tries the SSH remote first and falls back to HTTPS.
///
/// # Errors
/// Returns an error if the settings needed for the operation are missing or
/// invalid, or if the version control operation fails
pub fn execute(
    vcs: &impl VersionControl,
    config: &KbConfig,
    repo: &Path,
    command: &GitCommands,
    quiet: bool,
) -> Result<()> {
    match command {
        GitCommands::Clone => {
            config.validate_clone()?;
            let remote = clone_with_fallback(vcs, config, repo)?;
            if !quiet {
                println!(
                    "{}",
                    output::success(&format!("Cloned {remote} into {}", repo.display()))
                );
            }
        }
        GitCommands::Add => {
            vcs.stage_all(repo)?;
            if !quiet {
                println!("{}", output::success("All changes staged"));
            }
        }
        GitCommands::Commit { message } => {
            config.validate_core()?;
            let author = Signature::new(
                config.user_name.clone().unwrap_or_default(),
                config.user_email.clone().unwrap_or_default(),
            );
            match vcs.commit(repo, message, &author)? {
                CommitOutcome::Committed(id) => {
                    if quiet {
                        println!("{id}");
                    } else {
                        println!(
                            "{}",
                            output::success(&format!(
                                "Committed {id} as {} <{}>",
                                author.name, author.email
                            ))
                        );
                    }
                }
                CommitOutcome::NothingToCommit => {
                    if !quiet {
                        println!("{}", output::notice("Nothing staged, no commit created"));
                    }
                }
            }
        }
        GitCommands::Push => {
            let remote = config.remote().ok_or_else(|| {
                KbError::InvalidInput(
                    "No remote configured. Set remote_address_ssh or remote_address_https.".into(),
                )
            })?;
            vcs.push(repo, remote)?;
            if !quiet {
                println!("{}", output::success(&format!("Pushed to {remote}")));
            }
        }
    }
    Ok(())
}

/// Clone from the SSH remote, then the HTTPS one; returns the remote used
fn clone_with_fallback<'a>(vcs: &impl VersionControl, config: &'a KbConfig, repo: &Path) -> Result<&'a str> {
    let remotes = [
        config.remote_address_ssh.as_deref(),
        config.remote_address_https.as_deref(),
    ];

    let mut last_error = None;
    for remote in remotes.into_iter().flatten().filter(|r| !r.is_empty()) {
        match vcs.clone_repo(remote, repo) {
            Ok(()) => return Ok(remote),
            Err(e @ VcsError::TargetNotEmpty(_)) => return Err(e.into()),
            Err(e) => {
                warn!(remote, error = %e, "clone failed, trying next remote");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.map_or_else(
        || KbError::InvalidInput("No remote configured".into()),
        KbError::from,
    ))
}
