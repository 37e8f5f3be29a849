//! CI pipeline helpers for GitHub Actions.
//!
//! One binary with the commands the build workflows call:
//! - Configure the build environment (version string and release flag)
//! - Send a failure notification card to the team chat webhook
//!
//! Replaces per-workflow script snippets with a single tested tool.

use anyhow::Result;
use clap::{
    Parser,
    Subcommand,
};
use gha_build_tools::commands;
use gha_build_tools::commands::{
    ConfigureBuildArgs,
    NotifyFailureArgs,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the build version and publish it to GITHUB_ENV
    #[command(name = "configure-build")]
    ConfigureBuild(ConfigureBuildArgs),
    /// Post a failure notification card to the chat webhook
    #[command(name = "notify-failure")]
    NotifyFailure(NotifyFailureArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::ConfigureBuild(args) => commands::configure_build(args),
        Command::NotifyFailure(args) => commands::notify_failure(args),
    }
}
