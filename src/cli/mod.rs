//! CLI module - Command-line interface for snowtricks
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::Role;

/// Snowtricks - snowboard trick catalog, progress tracking and achievements
#[derive(Parser)]
#[command(name = "snowtricks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web API (default)
    #[command(alias = "server")]
    Serve,

    /// Apply migrations, create the default admin, import the catalog and
    /// seed the default achievements, then exit
    Seed,

    /// Create a default config.toml in the working directory
    #[command(alias = "--init")]
    Init,

    /// Print the leaderboard
    #[command(alias = "lb")]
    Leaderboard {
        /// Number of entries to show
        #[arg(long, short)]
        limit: Option<u64>,
    },

    /// Re-evaluate achievements for one user
    Check {
        /// User ID
        user_id: i32,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Create {
        username: String,
        email: String,
        password: String,
        /// guest, user, manager or admin
        #[arg(long, default_value = "user")]
        role: Role,
    },
}

pub use commands::*;
