//! Command-line arguments.

use clap::{Args, Parser, Subcommand};

/// Stratus command-line client.
#[derive(Debug, Parser)]
#[command(name = "stratus")]
#[command(version)]
#[command(about = "Command-line client for the Stratus file cloud")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// API base address
    #[arg(long, global = true, env = "STRATUS_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// File holding the session token
    #[arg(long, global = true, env = "STRATUS_STORAGE_PATH", value_name = "PATH")]
    pub storage_path: Option<String>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Signs in and stores the session token
    Login {
        /// Account name
        username: String,

        /// Account password
        #[arg(long, env = "STRATUS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Creates a new account
    Register {
        /// Account name
        username: String,

        /// Account password
        #[arg(long, env = "STRATUS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,
    },

    /// Signs out and forgets the session token
    Logout,

    /// Shows who is signed in
    Status,

    /// Opens a route, running its access guard
    Open {
        /// Route path, e.g. /files or /admin
        path: String,
    },

    /// Sends an authenticated GET request and prints the response body
    Get {
        /// API path, e.g. /api/files
        path: String,

        /// Extra request header ('Name: value'), repeatable
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,
    },
}
