//! # CLI Argument Definitions
//!
//! One subcommand per ledger operation, plus `admin` to read the current admin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "certchain")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Trust registry of verified institutions and the credentials they issue")]
pub struct Cli {
    /// Configuration file (TOML, JSON, or YAML). Defaults to `certchain.toml` when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LedgerCommand {
    /// Add an institution to the verified set (admin only)
    AddInstitution {
        #[arg(long)]
        caller: String,
        institution: String,
    },
    /// Remove an institution from the verified set (admin only)
    RemoveInstitution {
        #[arg(long)]
        caller: String,
        institution: String,
    },
    /// Check whether an institution is verified
    IsVerified { institution: String },
    /// Hand the admin role to another principal (admin only)
    TransferAdmin {
        #[arg(long)]
        caller: String,
        new_admin: String,
    },
    /// Issue a credential from a verified institution to a student
    Issue {
        #[arg(long)]
        sender: String,
        student: String,
        metadata: String,
    },
    /// Revoke a credential (issuer only)
    Revoke {
        #[arg(long)]
        sender: String,
        id: u64,
    },
    /// Show a credential
    Get { id: u64 },
    /// Show the current admin
    Admin,
}
