//! cli
//!
//! Command-line interface layer for Stratus.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT talk to the API directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! command handlers, which resolve their inputs through
//! [`crate::resolve`] and delegate the actual work to the
//! [`crate::api`] client.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::config::TargetStore;
use crate::resolve::ResolveOptions;
use crate::ui::output::Verbosity;

/// Per-invocation execution context shared by all commands.
#[derive(Debug)]
pub struct Context {
    /// Assume "yes" for confirmations; suppress prompts.
    pub force: bool,
    /// Whether interactive prompting is permitted.
    pub interactive: bool,
    /// Minimal output.
    pub quiet: bool,
    /// Verbose diagnostics.
    pub debug: bool,
    /// Where target state lives (tests point this at a temp directory).
    pub store: TargetStore,
}

impl Context {
    /// Output verbosity derived from flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Resolution settings derived from flags.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            force: self.force,
            interactive: self.interactive,
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        force: cli.force,
        interactive: cli.interactive(),
        quiet: cli.quiet,
        debug: cli.debug,
        store: TargetStore::open_default().context("Failed to locate state directory")?,
    };

    // Dispatch to command handler
    commands::dispatch(cli.command, &ctx)
}
