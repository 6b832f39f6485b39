use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowOutcome};
use git_release::config;
use git_release::git::Git2Repository;
use git_release::ui::{self, TerminalPrompter};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Bump the manifest version, commit and tag a release from conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Manifest holding the version (default: package.json)")]
    manifest: Option<PathBuf>,

    #[arg(short, long, help = "Remote to fetch from and push to (default: origin)")]
    remote: Option<String>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    yes: bool,

    #[arg(long, help = "Push the release commit and tag without asking")]
    push: bool,

    #[arg(long, help = "Show the planned release without making changes")]
    dry_run: bool,

    #[arg(long, help = "Do not fetch from the remote before planning")]
    skip_fetch: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    verbose: u8,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

impl Args {
    /// Log level selected by the `-v` count
    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    fn workflow_args(&self) -> ReleaseWorkflowArgs {
        ReleaseWorkflowArgs {
            manifest: self.manifest.clone(),
            remote: self.remote.clone(),
            yes: self.yes,
            push: self.push,
            dry_run: self.dry_run,
            skip_fetch: self.skip_fetch,
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("git-release {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let repo = Git2Repository::open(".")?;
    let mut prompter = TerminalPrompter;

    match run_release_workflow(&repo, &mut prompter, &args.workflow_args(), &config)? {
        WorkflowOutcome::Released { tag, pushed, .. } => {
            tracing::info!(tag = %tag, pushed, "release finished");
        }
        WorkflowOutcome::DryRun { plan } => {
            tracing::info!(next = %plan.next, "dry run finished");
        }
        WorkflowOutcome::NoNewCommits { .. } | WorkflowOutcome::Cancelled => {}
    }

    Ok(())
}
