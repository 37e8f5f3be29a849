//! Configure build environment command.
//!
//! This command derives the build version and release flag for the current
//! CI run and publishes them to later workflow steps through the `GITHUB_ENV`
//! command file. It replaces per-workflow shell snippets with one place that
//! understands every trigger:
//!
//! - **push / anything else**: default version `0.0.0<ref-suffix>-ci<run>`,
//!   not a release
//! - **release**: the release tag becomes the version, always a release
//! - **workflow_dispatch**: optional version override plus an explicit
//!   publish checkbox
//!
//! All required inputs are validated up front and every problem is reported
//! as a `::error::` annotation before the command exits, so a misconfigured
//! workflow surfaces all of its mistakes in a single failed run.
//!
//! # Examples
//!
//! ```bash
//! # Inside a workflow step: everything comes from the GitHub-provided
//! # environment
//! gha-build-tools configure-build
//!
//! # Locally, with explicit values
//! gha-build-tools configure-build \
//!     --event-name push \
//!     --ref refs/heads/main \
//!     --run-number 42 \
//!     --github-env /tmp/github-env
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::common::{
    exit_for_errors,
    normalize_input,
};
use crate::error::ValidationError;
use crate::gha::CommandFile;
use crate::version::{
    self,
    CiContext,
};

/// Arguments for the `configure-build` command.
#[derive(Parser, Debug)]
pub struct ConfigureBuildArgs {
    /// Name of the event that triggered the workflow.
    ///
    /// Defaults to the `GITHUB_EVENT_NAME` environment variable.
    #[arg(long = "event-name", env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Fully-formed ref of the branch or tag being built, e.g.
    /// `refs/heads/main` or `refs/tags/v1.2.3`.
    ///
    /// Defaults to the `GITHUB_REF` environment variable.
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub github_ref: Option<String>,

    /// Number of the current run within its workflow.
    ///
    /// Distinguishes CI builds of the same ref. Defaults to the
    /// `GITHUB_RUN_NUMBER` environment variable.
    #[arg(long = "run-number", env = "GITHUB_RUN_NUMBER")]
    pub run_number: Option<String>,

    /// Tag name of the release being published.
    ///
    /// Required for `release` events, ignored otherwise. Defaults to the
    /// `RELEASE_VERSION` environment variable.
    #[arg(long = "release-version", env = "RELEASE_VERSION")]
    pub release_version: Option<String>,

    /// Version override for a manually dispatched run.
    ///
    /// Leave empty to keep the default CI version. Defaults to the
    /// `WORKFLOW_DISPATCH_VERSION` environment variable.
    #[arg(long = "dispatch-version", env = "WORKFLOW_DISPATCH_VERSION")]
    pub dispatch_version: Option<String>,

    /// Whether a manually dispatched run publishes packages.
    ///
    /// Required for `workflow_dispatch` events, ignored otherwise. Defaults
    /// to the `WORKFLOW_DISPATCH_WILL_PUBLISH_PACKAGES` environment variable.
    #[arg(
        long = "will-publish-packages",
        env = "WORKFLOW_DISPATCH_WILL_PUBLISH_PACKAGES"
    )]
    pub dispatch_will_publish: Option<String>,

    /// Path of the environment command file shared with later steps.
    ///
    /// Defaults to the `GITHUB_ENV` environment variable, which GitHub
    /// Actions sets for every step.
    #[arg(long = "github-env", env = "GITHUB_ENV")]
    pub github_env: Option<PathBuf>,
}

/// Derive the build version for this run and publish it to `GITHUB_ENV`.
///
/// Writes two variables for later workflow steps:
///
/// - `CiBuildVersion`: the validated version string
/// - `CiIsForRelease`: `true` or `false`
///
/// Nothing is written until every input has been validated, so a failing
/// run never leaves a half-configured environment behind.
///
/// # Errors
///
/// Returns an error after annotating every problem when:
/// - a required input is missing for the triggering event
/// - the resolved version does not match the release grammar
/// - `GITHUB_ENV` is not set
///
/// and without annotations when the command file cannot be opened or
/// appended to.
///
/// # Examples
///
/// ```no_run
/// use gha_build_tools::commands::{
///     ConfigureBuildArgs,
///     configure_build,
/// };
///
/// # fn main() -> anyhow::Result<()> {
/// let args = ConfigureBuildArgs {
///     event_name: Some("push".to_string()),
///     github_ref: Some("refs/heads/main".to_string()),
///     run_number: Some("42".to_string()),
///     release_version: None,
///     dispatch_version: None,
///     dispatch_will_publish: None,
///     github_env: Some("/tmp/github-env".into()),
/// };
/// configure_build(args)?;
/// # Ok(())
/// # }
/// ```
///
/// # Example Output
///
/// ```text
/// Configuring build environment to build version 0.0.0-ci42
/// ```
///
/// ```text
/// Configuring build environment to build and release version 2.0.0
/// ```
pub fn configure_build(args: ConfigureBuildArgs) -> Result<()> {
    let ctx = CiContext {
        event_name: normalize_input(args.event_name),
        github_ref: normalize_input(args.github_ref),
        run_number: normalize_input(args.run_number),
        release_version: normalize_input(args.release_version),
        dispatch_version: normalize_input(args.dispatch_version),
        dispatch_will_publish: normalize_input(args.dispatch_will_publish),
    };

    let mut errors = Vec::new();
    let decision = match version::resolve(&ctx) {
        Ok(decision) => Some(decision),
        Err(resolve_errors) => {
            errors.extend(resolve_errors);
            None
        }
    };

    let github_env = args.github_env.filter(|path| !path.as_os_str().is_empty());
    if github_env.is_none() {
        errors.push(ValidationError::missing("GITHUB_ENV"));
    }

    // Both are present exactly when no error was collected above.
    let (Some(decision), Some(github_env)) = (decision, github_env) else {
        return Err(exit_for_errors(&errors));
    };

    println!(
        "Configuring build environment to build{} version {}",
        if decision.is_release { " and release" } else { "" },
        decision.version
    );

    let env_file = CommandFile::new(github_env);
    env_file.set("CiBuildVersion", &decision.version)?;
    env_file.set(
        "CiIsForRelease",
        if decision.is_release { "true" } else { "false" },
    )?;

    Ok(())
}
