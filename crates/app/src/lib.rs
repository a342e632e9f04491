//! Stratus - command-line client for the Stratus file cloud.
//!
//! The binary is a thin shell over [`App`], which binds the session layer
//! to the file-backed token store and the reqwest HTTP client.

pub mod app;
pub mod cli;
pub mod commands;

pub use app::{App, SessionStatus};
pub use cli::Cli;
pub use commands::{load_config, run};
