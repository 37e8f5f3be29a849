//! Command implementations.

mod common;
mod configure_build;
mod notify_failure;

// Re-export all command argument structs and functions
pub use configure_build::{
    ConfigureBuildArgs,
    configure_build,
};
pub use notify_failure::{
    NotifyFailureArgs,
    notify_failure,
};
