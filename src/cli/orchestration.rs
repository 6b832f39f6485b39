//! Main workflow orchestration logic
//!
//! Drives one release from fetch to push. It is kept apart from `main.rs`
//! so the whole flow can run against a mock repository and scripted answers.

use std::path::PathBuf;

use anyhow::Result;

use crate::analyzer::{Baseline, FallbackVersion, ReleasePlan, ReleaseResolver};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::conventional::{CommitClassifier, TypeMapping};
use crate::error::ReleaseError;
use crate::git::Repository;
use crate::manifest::Manifest;
use crate::ui::{self, Prompter};

/// Arguments for the release workflow
///
/// Mirrors the CLI Args without depending on clap. `None` fields fall back
/// to the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Manifest to read and bump
    pub manifest: Option<PathBuf>,

    /// Remote to fetch from and push to
    pub remote: Option<String>,

    /// Answer the confirmation prompts without asking
    pub yes: bool,

    /// Push branch and tag without asking
    pub push: bool,

    /// Show the plan and stop
    pub dry_run: bool,

    /// Do not contact the remote before planning
    pub skip_fetch: bool,
}

/// How a workflow run ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// Nothing to release since the last tag
    NoNewCommits { latest_tag: Option<String> },

    /// Dry run; the plan was shown and nothing was written
    DryRun { plan: ReleasePlan },

    /// The user stopped the run before anything was written
    Cancelled,

    /// Manifest written, commit and tag created
    Released {
        plan: ReleasePlan,
        tag: String,
        pushed: bool,
    },
}

/// Main release workflow
///
/// 1. Fetch the remote (failures are warnings) and refuse to run when behind
/// 2. Plan the release from history and the manifest
/// 3. Show commits, release type and version change
/// 4. On confirmation, write the manifest, commit and tag
/// 5. Push when asked to
///
/// # Arguments
/// * `repo` - Repository to read and write
/// * `prompter` - Source of confirmation answers
/// * `args` - Workflow arguments
/// * `config` - Loaded configuration
///
/// # Returns
/// The outcome of the run, or the first fatal error
pub fn run_release_workflow<R, P>(
    repo: &R,
    prompter: &mut P,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<WorkflowOutcome>
where
    R: Repository + ?Sized,
    P: Prompter + ?Sized,
{
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.release.remote.clone());
    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| config.release.manifest.clone());

    if !args.skip_fetch && !sync_with_remote(repo, prompter, args, &remote)? {
        ui::display_status("Operation cancelled by user.");
        return Ok(WorkflowOutcome::Cancelled);
    }

    let spinner = ui::Spinner::start("Checking branch status...");
    if repo.is_behind_remote()? {
        spinner.clear();
        return Err(ReleaseError::BehindRemote { remote }.into());
    }
    spinner.succeed("Local branch is not behind its upstream");

    let history = repo.history()?;
    let mut manifest = Manifest::open(&manifest_path)?;
    let fallback = FallbackVersion {
        manifest: manifest_path.clone(),
        version: manifest.version_str().map(str::to_string),
    };

    let resolver = ReleaseResolver::new(CommitClassifier::new(TypeMapping::from(
        &config.conventional_commits,
    )));

    let plan = match resolver.plan(&history, &fallback)? {
        Some(plan) => plan,
        None => {
            let latest_tag = resolver.resolve_window(&history).last_tag.map(|t| t.name);
            ui::display_boundary_warning(&BoundaryWarning::NoNewCommits {
                latest_tag: latest_tag.clone(),
            });
            return Ok(WorkflowOutcome::NoNewCommits { latest_tag });
        }
    };

    if let Baseline::Manifest(path) = &plan.baseline {
        ui::display_boundary_warning(&BoundaryWarning::NoReleaseTag {
            manifest: path.clone(),
            version: plan.previous.to_string(),
        });
    }

    let messages: Vec<&str> = plan.commits.iter().map(|c| c.message.as_str()).collect();
    ui::display_release_commits(&messages);
    ui::display_release_summary(plan.bump, &plan.previous, &plan.next);

    if args.dry_run {
        ui::display_status("Dry run, nothing was written.");
        return Ok(WorkflowOutcome::DryRun { plan });
    }

    if !args.yes && !prompter.confirm("Proceed?", true)? {
        ui::display_status("Operation cancelled by user.");
        return Ok(WorkflowOutcome::Cancelled);
    }

    let tag = plan.tag();
    let next = plan.next.to_string();

    manifest.set_version(&plan.next)?;
    manifest.save()?;
    ui::display_success(&format!(
        "Updated {} to {}",
        manifest.path().display(),
        next
    ));

    let message = config.release.commit_message_for(&next);
    let spinner = ui::Spinner::start("Committing release...");
    repo.commit_paths(&[manifest.path()], &message)?;
    spinner.succeed(&format!("Committed \"{}\"", message));

    let spinner = ui::Spinner::start(format!("Creating tag {}...", tag.name));
    repo.create_tag(&tag.name)?;
    spinner.succeed(&format!("Created tag {}", tag.name));

    let push = args.push || (!args.yes && prompter.confirm("Push?", false)?);
    if push {
        let spinner = ui::Spinner::start(format!("Pushing to {}...", remote));
        repo.push(&remote, &[tag.name.as_str()])?;
        spinner.succeed(&format!("Pushed {} to {}", tag.name, remote));
    } else {
        ui::display_manual_push_instruction(&tag.name, &remote);
    }

    ui::display_done(&manifest.kind().publish_hint(&plan.next));

    Ok(WorkflowOutcome::Released {
        plan,
        tag: tag.name,
        pushed: push,
    })
}

/// Fetch `remote`, asking whether to go on with local data when that fails.
///
/// Returns `false` when the user declines.
fn sync_with_remote<R, P>(
    repo: &R,
    prompter: &mut P,
    args: &ReleaseWorkflowArgs,
    remote: &str,
) -> Result<bool>
where
    R: Repository + ?Sized,
    P: Prompter + ?Sized,
{
    let spinner = ui::Spinner::start(format!("Fetching latest data from {}...", remote));
    match repo.fetch_from_remote(remote) {
        Ok(()) => {
            spinner.succeed("Fetched latest data from remote");
            Ok(true)
        }
        Err(e) => {
            spinner.clear();
            tracing::warn!(remote, error = %e, "fetch failed");
            ui::display_boundary_warning(&BoundaryWarning::from_fetch_error(
                remote,
                &e.to_string(),
            ));
            if args.yes || args.dry_run {
                return Ok(true);
            }
            prompter.confirm("Continue using local data?", true)
        }
    }
}
