//! Version control boundary
//!
//! The catalog never depends on version control. These operations sync the
//! repository directory with a remote and can run before or after a
//! reconcile. [`Libgit2Vcs`] talks to repositories through libgit2.
//!
//! Remote credentials are looked up in order: the ssh agent, the default key
//! files under `~/.ssh` (`id_ed25519`, then `id_rsa`), git's credential
//! helpers, and finally libgit2's default credentials.

use git2::build::RepoBuilder;
use git2::{
    Cred, CredentialType, ErrorCode, FetchOptions, IndexAddOption, PushOptions, RemoteCallbacks,
    Repository,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod error;

pub use error::VcsError;

type Result<T> = std::result::Result<T, VcsError>;

/// Credential callbacks allowed per remote operation before giving up
const MAX_CREDENTIAL_ATTEMPTS: usize = 4;

/// Default private keys, in preference order
const SSH_KEY_NAMES: [&str; 2] = ["id_ed25519", "id_rsa"];

/// Commit author identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Result of a commit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// New commit, identified by its abbreviated hash
    Committed(String),
    /// Nothing was staged
    NothingToCommit,
}

/// Operations on the working copy of a repository
pub trait VersionControl {
    /// Clone `remote` into `local`, which must be missing or empty
    ///
    /// # Errors
    ///
    /// Returns `VcsError::TargetNotEmpty` if `local` has content, or another
    /// `VcsError` if the clone fails.
    fn clone_repo(&self, remote: &str, local: &Path) -> Result<()>;

    /// Stage every change in the working copy, deletions included
    ///
    /// # Errors
    ///
    /// Returns `VcsError` if staging fails.
    fn stage_all(&self, repo: &Path) -> Result<()>;

    /// Commit the staged changes
    ///
    /// # Errors
    ///
    /// Returns `VcsError::InvalidInput` for an empty message, or another
    /// `VcsError` if the commit fails.
    fn commit(&self, repo: &Path, message: &str, author: &Signature) -> Result<CommitOutcome>;

    /// Push the current branch to `remote`
    ///
    /// # Errors
    ///
    /// Returns `VcsError` if the push fails or is rejected.
    fn push(&self, repo: &Path, remote: &str) -> Result<()>;
}

/// [`VersionControl`] backed by libgit2
#[derive(Debug, Clone, Default)]
pub struct Libgit2Vcs {
    ssh_dir: Option<PathBuf>,
}

impl Libgit2Vcs {
    /// Look for ssh keys in the user's `~/.ssh`
    #[must_use]
    pub fn new() -> Self {
        Self {
            ssh_dir: dirs::home_dir().map(|home| home.join(".ssh")),
        }
    }

    /// Look for ssh keys in a specific directory
    pub fn with_ssh_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            ssh_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn open(repo: &Path) -> Result<Repository> {
        Repository::open(repo).map_err(VcsError::git("open repository"))
    }

    fn ssh_key(&self) -> Option<PathBuf> {
        let dir = self.ssh_dir.as_ref()?;
        SSH_KEY_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    fn callbacks(&self) -> RemoteCallbacks<'static> {
        let key = self.ssh_key();
        let mut attempts = 0;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, username, allowed| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("no accepted credentials"));
            }
            credentials(url, username, allowed, attempts, key.as_deref())
        });
        callbacks.push_update_reference(|reference, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "{reference} rejected: {reason}"
            ))),
            None => Ok(()),
        });
        callbacks
    }
}

/// Pick credentials for one authentication attempt
fn credentials(
    url: &str,
    username: Option<&str>,
    allowed: CredentialType,
    attempt: usize,
    key: Option<&Path>,
) -> std::result::Result<Cred, git2::Error> {
    debug!(url, attempt, ?allowed, "remote asked for credentials");

    if allowed.contains(CredentialType::SSH_KEY) {
        let user = username.unwrap_or("git");
        return match key {
            Some(key) if attempt > 1 => Cred::ssh_key(user, None, key, None),
            _ => Cred::ssh_key_from_agent(user),
        };
    }

    if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
        let config = git2::Config::open_default()?;
        return Cred::credential_helper(&config, url, username);
    }

    if allowed.contains(CredentialType::USERNAME) {
        return Cred::username(username.unwrap_or("git"));
    }

    Cred::default()
}

impl VersionControl for Libgit2Vcs {
    fn clone_repo(&self, remote: &str, local: &Path) -> Result<()> {
        if is_non_empty_dir(local) {
            return Err(VcsError::TargetNotEmpty(local.to_path_buf()));
        }

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(self.callbacks());
        RepoBuilder::new()
            .fetch_options(fetch)
            .clone(remote, local)
            .map_err(|e| {
                warn!(remote, error = %e, "clone failed");
                VcsError::git("clone")(e)
            })?;

        info!(remote, local = %local.display(), "repository cloned");
        Ok(())
    }

    fn stage_all(&self, repo: &Path) -> Result<()> {
        let repository = Self::open(repo)?;
        let mut index = repository.index().map_err(VcsError::git("read index"))?;

        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .and_then(|()| index.update_all(["*"], None))
            .and_then(|()| index.write())
            .map_err(VcsError::git("stage"))?;

        info!(repo = %repo.display(), entries = index.len(), "all changes staged");
        Ok(())
    }

    fn commit(&self, repo: &Path, message: &str, author: &Signature) -> Result<CommitOutcome> {
        let message = message.trim();
        if message.is_empty() {
            return Err(VcsError::InvalidInput("Commit message cannot be empty".into()));
        }

        let repository = Self::open(repo)?;
        let mut index = repository.index().map_err(VcsError::git("read index"))?;
        let tree_id = index.write_tree().map_err(VcsError::git("write tree"))?;

        let parent = match repository.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(VcsError::git("read HEAD"))?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(VcsError::git("read HEAD")(e)),
        };

        let unchanged = match &parent {
            Some(parent) => parent.tree_id() == tree_id,
            None => index.is_empty(),
        };
        if unchanged {
            debug!(repo = %repo.display(), "nothing staged");
            return Ok(CommitOutcome::NothingToCommit);
        }

        let tree = repository.find_tree(tree_id).map_err(VcsError::git("read tree"))?;
        let signature = git2::Signature::now(&author.name, &author.email)
            .map_err(VcsError::git("build signature"))?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = repository
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(VcsError::git("commit"))?;

        let id = repository
            .find_object(oid, None)
            .and_then(|object| object.short_id())
            .map_err(VcsError::git("read commit id"))?;
        let id = id.as_str().map_or_else(|| oid.to_string(), str::to_string);

        info!(repo = %repo.display(), commit = %id, "committed");
        Ok(CommitOutcome::Committed(id))
    }

    fn push(&self, repo: &Path, remote: &str) -> Result<()> {
        let repository = Self::open(repo)?;
        let head = repository.head().map_err(VcsError::git("read HEAD"))?;
        let branch = match head.name() {
            Some(name) if head.is_branch() => name.to_string(),
            _ => return Err(VcsError::InvalidInput("HEAD is not on a branch".into())),
        };

        let mut target = repository
            .remote_anonymous(remote)
            .map_err(VcsError::git("resolve remote"))?;
        let mut options = PushOptions::new();
        options.remote_callbacks(self.callbacks());

        let refspec = format!("{branch}:{branch}");
        target.push(&[refspec.as_str()], Some(&mut options)).map_err(|e| {
            warn!(remote, %branch, error = %e, "push failed");
            VcsError::git("push")(e)
        })?;

        info!(repo = %repo.display(), remote, %branch, "pushed");
        Ok(())
    }
}

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}
