//! Pure formatting functions for UI output.
//!
//! Row and line builders return strings so they can be tested; the
//! `display_*` functions print them.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::commit::subject_line;
use crate::domain::{ConventionalCommit, Version, VersionBump};

/// Label shown for messages without a conventional header.
pub const NON_CONVENTIONAL: &str = "non-conventional";

/// One line of the "Commits in release" listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRow {
    /// Description, or the whole subject for non-conventional messages
    pub text: String,
    /// Parsed header, `None` for non-conventional messages
    pub header: Option<ConventionalCommit>,
}

impl CommitRow {
    pub fn from_message(message: &str) -> Self {
        match ConventionalCommit::decompose(message) {
            Some(parsed) => CommitRow {
                text: parsed.description.clone(),
                header: Some(parsed),
            },
            None => CommitRow {
                text: subject_line(message).to_string(),
                header: None,
            },
        }
    }
}

/// Rows for a list of messages
pub fn commit_rows<'a, I>(messages: I) -> Vec<CommitRow>
where
    I: IntoIterator<Item = &'a str>,
{
    messages.into_iter().map(CommitRow::from_message).collect()
}

/// Format rows as `text | type [scope]`, with the texts padded to a common
/// width two columns wider than the longest.
pub fn format_commit_rows(rows: &[CommitRow]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|row| row.text.chars().count())
        .max()
        .unwrap_or(0)
        + 2;

    rows.iter()
        .map(|row| {
            let padded = format!("{:<width$}", row.text, width = width);
            let label = match &row.header {
                Some(ConventionalCommit {
                    r#type,
                    scope: Some(scope),
                    ..
                }) => format!(
                    "{} {}{}{}",
                    style(r#type).green(),
                    style("[").dim(),
                    style(scope).blue(),
                    style("]").dim()
                ),
                Some(ConventionalCommit { r#type, .. }) => style(r#type).green().to_string(),
                None => style(NON_CONVENTIONAL).yellow().to_string(),
            };
            format!("{}{} {}", padded, style("|").dim(), label)
        })
        .collect()
}

/// Release type label, colored by significance
pub fn format_release_type(bump: VersionBump) -> String {
    let label = bump.to_string();
    match bump {
        VersionBump::Patch => style(label).blue().to_string(),
        VersionBump::Minor => style(label).green().to_string(),
        VersionBump::Major => style(label).yellow().to_string(),
    }
}

/// `old => new`
pub fn format_version_change(previous: &Version, next: &Version) -> String {
    format!(
        "{} {} {}",
        style(previous).blue(),
        style("=>").dim(),
        style(next).green()
    )
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the commits of the release with their classification.
pub fn display_release_commits(messages: &[&str]) {
    println!("\n{}", style("Commits in release:").magenta());
    for line in format_commit_rows(&commit_rows(messages.iter().copied())) {
        println!("{}", line);
    }
}

/// Display the release type and the version change.
pub fn display_release_summary(bump: VersionBump, previous: &Version, next: &Version) {
    println!(
        "\n{} {}",
        style("Release type:").magenta(),
        format_release_type(bump)
    );
    println!(
        "{} {}\n",
        style("Version:").magenta(),
        format_version_change(previous, next)
    );
}

/// Display the final message and what to do next.
pub fn display_done(publish_hint: &str) {
    println!("\n{}", style("Done!").green().bold());
    println!("{}", style(publish_hint).yellow());
}

/// Display the git command needed to push later.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this release later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} HEAD {}", remote, tag)).cyan()
    );
}
