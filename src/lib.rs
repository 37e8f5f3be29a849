#![doc = include_str!("../README.md")]

/// Command implementations and argument types.
pub mod commands;
/// Error types shared by the commands.
pub mod error;
/// GitHub Actions command-file and annotation helpers.
pub mod gha;
/// Build version derivation and validation.
pub mod version;
