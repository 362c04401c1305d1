//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--force` / `-f`: Assume "yes" for confirmations; never prompt
//! - `--non-interactive`: Disable prompts
//! - `--quiet` / `-q`: Minimal output; implies --non-interactive
//! - `--debug`: Enable debug output

use std::io::IsTerminal;

use clap::{Parser, Subcommand, ValueEnum};

/// Stratus - CLI client for the Stratus application platform
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Assume "yes" for all confirmations; never prompt
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Minimal output; implies --non-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Interactive unless `--force`, `--non-interactive`, or `--quiet` was
    /// set, and only when stdin is a terminal.
    pub fn interactive(&self) -> bool {
        if self.force || self.non_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Shells supported by the completion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or set the current target (API endpoint, organization, space)
    #[command(
        name = "target",
        long_about = "Show or set the current target.\n\n\
            With no arguments, shows the API endpoint, organization, and space \
            that commands currently operate in. Pass a URL to retarget the API \
            (this clears the organization and space), or use -o / -s to switch \
            within the current endpoint.",
        after_help = "\
EXAMPLES:
    # Show the current target
    stratus target

    # Target a platform endpoint
    stratus target api.stratus.example.com

    # Switch organization (prompts for a space when interactive)
    stratus target -o acme

    # Switch space within the current organization
    stratus target -s staging"
    )]
    Target {
        /// API endpoint URL
        url: Option<String>,

        /// Organization to switch to
        #[arg(short = 'o', long = "org", value_name = "ORG")]
        organization: Option<String>,

        /// Space to switch to
        #[arg(short = 's', long = "space", value_name = "SPACE")]
        space: Option<String>,
    },

    /// Authenticate with the targeted platform
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Discard the stored session token for the current target
    Logout,

    /// Update your password
    Passwd {
        /// User to update (defaults to the current user)
        user: Option<String>,
    },

    /// List organizations
    Orgs,

    /// Create an organization
    #[command(name = "create-org")]
    CreateOrg {
        /// Organization name (prompted when omitted)
        name: Option<String>,

        /// Target the new organization after creating it
        #[arg(long)]
        target: bool,
    },

    /// Delete one or more organizations
    #[command(
        name = "delete-org",
        long_about = "Delete one or more organizations.\n\n\
            Each organization is confirmed individually unless --force is set. \
            An organization that still contains spaces is not deleted; rerun \
            with --recursive to delete it along with everything inside."
    )]
    DeleteOrg {
        /// Organizations to delete
        #[arg(value_name = "ORG", required = true)]
        orgs: Vec<String>,

        /// Delete recursively, including all contained spaces and apps
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// List spaces in the current organization
    Spaces,

    /// Create a space
    #[command(name = "create-space")]
    CreateSpace {
        /// Space name (prompted when omitted)
        name: Option<String>,

        /// Space's organization (defaults to the current organization)
        #[arg(short = 'o', long = "org", value_name = "ORG")]
        organization: Option<String>,

        /// Target the new space after creating it
        #[arg(long)]
        target: bool,
    },

    /// Delete one or more spaces and their contents
    #[command(
        name = "delete-space",
        long_about = "Delete one or more spaces.\n\n\
            Each space is confirmed individually unless --force is set, so a \
            batch delete can skip some spaces and proceed with others. A space \
            that still contains apps is not deleted; rerun with --recursive to \
            delete it along with everything inside.",
        after_help = "\
EXAMPLES:
    # Delete a single space, with confirmation
    stratus delete-space staging

    # Delete several spaces without prompting
    stratus --force delete-space staging qa-1 qa-2

    # Delete a space and everything in it
    stratus delete-space staging --recursive"
    )]
    DeleteSpace {
        /// Spaces to delete
        #[arg(value_name = "SPACE")]
        spaces: Vec<String>,

        /// Space's organization (defaults to the current organization)
        #[arg(short = 'o', long = "org", value_name = "ORG")]
        organization: Option<String>,

        /// Delete recursively, including all contained apps
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Skip the warning when the last space in the organization is deleted
        #[arg(long)]
        no_warn: bool,
    },

    /// List applications in the current space
    Apps,

    /// Change an application's memory, disk, or instance count
    #[command(
        name = "scale",
        long_about = "Change an application's resource allocation.\n\n\
            Memory and disk accept megabytes (\"512\", \"512M\") or gigabytes \
            (\"2G\"). With no flags, shows the app's current allocation. When \
            --restart is set and memory or disk changed, a started app is \
            restarted so the new limits take effect."
    )]
    Scale {
        /// Application to scale (prompted when omitted)
        app: Option<String>,

        /// Memory limit (e.g. 512M, 2G)
        #[arg(long, value_name = "SIZE")]
        memory: Option<String>,

        /// Number of instances
        #[arg(long, value_name = "COUNT")]
        instances: Option<String>,

        /// Disk quota (e.g. 1G)
        #[arg(long, value_name = "SIZE")]
        disk: Option<String>,

        /// Restart the app if memory or disk changed
        #[arg(long)]
        restart: bool,
    },

    /// Delete one or more applications
    #[command(name = "delete")]
    DeleteApp {
        /// Applications to delete
        #[arg(value_name = "APP")]
        apps: Vec<String>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
