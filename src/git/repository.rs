use crate::domain::{Commit, ReleaseTag};
use crate::error::{ReleaseError, Result};
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working tree").into())
    }

    /// `HEAD` commit, or `None` on an unborn branch
    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Name of the branch `HEAD` points to, `None` when detached or unborn
    fn current_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Tag names grouped by the commit they point to (annotated tags peeled).
    fn tags_by_commit(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut tags: HashMap<Oid, Vec<String>> = HashMap::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(_) => continue,
            };
            // Tags on trees or blobs cannot bound a release window.
            if let Ok(commit) = reference.peel_to_commit() {
                tags.entry(commit.id()).or_default().push(name.to_string());
            }
        }

        Ok(tags)
    }

    /// Path of `path` relative to the working tree root
    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let root = fs::canonicalize(self.workdir()?)?;
        let absolute = fs::canonicalize(path)?;
        absolute
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                git2::Error::from_str(&format!(
                    "{} is outside the working tree {}",
                    path.display(),
                    root.display()
                ))
                .into()
            })
    }
}

/// Credential and push-status callbacks shared by fetch and push.
///
/// Tries SSH keys from `~/.ssh/`, then the SSH agent, then the default
/// credential helper.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn history(&self) -> Result<Vec<Commit>> {
        let head = match self.head_commit()? {
            Some(commit) => commit.id(),
            None => return Ok(Vec::new()),
        };

        let tags = self.tags_by_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            let tag_refs = tags.get(&oid).cloned().unwrap_or_default();
            let released = tag_refs.iter().any(|name| ReleaseTag::parse(name).is_some());

            commits.push(Commit { message, tag_refs });
            if released {
                break;
            }
        }

        tracing::debug!(commits = commits.len(), "read history from HEAD");
        Ok(commits)
    }

    fn fetch_from_remote(&self, remote: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote);
        let refspecs = [refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];
        remote_handle
            .fetch(&refspecs, Some(&mut fetch_options), None)
            .map_err(|e| ReleaseError::remote(format!("Fetch from '{}' failed: {}", remote, e)))?;

        tracing::info!(remote, "fetched remote");
        Ok(())
    }

    fn is_behind_remote(&self) -> Result<bool> {
        let branch_name = match self.current_branch()? {
            Some(name) => name,
            None => return Ok(false),
        };

        let branch = self.repo.find_branch(&branch_name, BranchType::Local)?;
        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!(branch = %branch_name, "branch has no upstream");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let (Some(local), Some(remote)) = (branch.get().target(), upstream.get().target()) else {
            return Ok(false);
        };

        let (ahead, behind) = self.repo.graph_ahead_behind(local, remote)?;
        tracing::debug!(branch = %branch_name, ahead, behind, "compared with upstream");
        Ok(behind > 0)
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            let relative = self.relative_to_workdir(path)?;
            index.add_path(&relative)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        tracing::info!(commit = %oid, "created release commit");
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self
            .head_commit()?
            .ok_or_else(|| git2::Error::from_str("cannot tag an unborn HEAD"))?;

        self.repo.tag_lightweight(name, head.as_object(), false)?;
        tracing::info!(tag = name, commit = %head.id(), "created tag");
        Ok(())
    }

    fn push(&self, remote: &str, tags: &[&str]) -> Result<()> {
        let branch = self
            .current_branch()?
            .ok_or_else(|| ReleaseError::remote("HEAD is not on a branch, nothing to push"))?;

        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut refspecs = vec![format!("refs/heads/{0}:refs/heads/{0}", branch)];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{0}:refs/tags/{0}", tag)));

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote_handle
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                }
                git2::ErrorClass::Reference => {
                    ReleaseError::remote(format!("Reference error during push: {}", e))
                }
                _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)),
            })?;

        tracing::info!(remote, branch = %branch, tags = tags.len(), "pushed release");
        Ok(())
    }
}
