//! Command line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use club_client::Club;

/// Club directory and events from the terminal
#[derive(Debug, Parser)]
#[command(name = "club-app", version, about)]
pub struct Cli {
    /// File the backend session is kept in between runs
    #[arg(
        long,
        env = "SESSION_FILE",
        default_value = ".club-session.json",
        global = true
    )]
    pub session_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the signed-in account and member row
    Whoami,
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and its member row
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLUB_PASSWORD", hide_env_values = true)]
        password: String,
        /// Full name, "First Last"
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// One of: Phi Kappa Alpha, Omega Chi, Chi Beta Chi, Sigma Rho, Xi Chi Delta
        #[arg(long)]
        club: Club,
    },
    /// Sign out
    Logout,
    /// List the members of your club
    Directory {
        /// Only members whose first or last name contains this text
        #[arg(long, short)]
        query: Option<String>,
        /// Open the profile of this member number
        #[arg(long)]
        show: Option<i64>,
    },
    /// List upcoming events
    Events,
}
