//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Declares its inputs as a `CommandSpec`
//! 2. Resolves them on demand through a `Resolver`
//! 3. Delegates the work to the `CloudClient`
//! 4. Renders progress and results
//!
//! Handlers receive the client and prompter as trait objects so tests can
//! substitute the mock client and a scripted prompter.
//!
//! # Async Commands
//!
//! Every command that talks to the platform is async. The dispatch
//! function creates a tokio runtime and runs the async handlers inside it.

mod app;
mod completion;
mod login;
mod org;
mod passwd;
mod space;
mod target;

// Re-export command functions for testing and direct invocation
pub use app::{apps, delete_apps, scale, ScaleOpts};
pub use completion::completion;
pub use login::{login, logout};
pub use org::{create_org, delete_org, orgs};
pub use passwd::passwd;
pub use space::{create_space, delete_space, spaces, DeleteSpaceOpts};
pub use target::{target, TargetOpts};

use anyhow::{anyhow, Context as _, Result};

use crate::api::types::{Organization, Space};
use crate::api::{CloudClient, HttpCloudClient};
use crate::cli::args::Command;
use crate::cli::Context;
use crate::config::{normalize_target_url, TargetConfig};
use crate::resolve::{GivenSource, RawValue};
use crate::secrets::{token_key, FileSecretStore, SecretStore};
use crate::ui::prompts::TerminalPrompter;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Completion is purely local; everything else may hit the network.
        Command::Completion { shell } => completion(shell),
        other => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(dispatch_async(other, ctx))
        }
    }
}

async fn dispatch_async(command: Command, ctx: &Context) -> Result<()> {
    let mut prompter = TerminalPrompter::new();

    match command {
        Command::Target {
            url,
            organization,
            space,
        } => {
            let opts = TargetOpts {
                url: url.map(|u| normalize_target_url(&u)),
                organization,
                space,
            };
            // Switching org/space needs the API; showing or setting the
            // endpoint does not.
            let client = if opts.needs_client() {
                let config = ctx.store.load()?;
                let api = opts
                    .url
                    .clone()
                    .or(config.api)
                    .ok_or_else(|| anyhow!("{}", NO_TARGET_HINT))?;
                Some(build_client(&api)?)
            } else {
                None
            };
            target(
                ctx,
                client.as_ref().map(|c| c as &dyn CloudClient),
                &mut prompter,
                opts,
            )
            .await
        }

        Command::Login { email } => {
            let (client, config) = client_for(ctx)?;
            let secrets = FileSecretStore::open_default()?;
            login(ctx, &client, &mut prompter, &secrets, &config, email).await
        }

        Command::Logout => {
            let config = ctx.store.load()?;
            let secrets = FileSecretStore::open_default()?;
            logout(ctx, &secrets, &config)
        }

        Command::Passwd { user } => {
            let (client, _) = client_for(ctx)?;
            passwd(ctx, &client, &mut prompter, user).await
        }

        Command::Orgs => {
            let (client, _) = client_for(ctx)?;
            orgs(ctx, &client).await
        }

        Command::CreateOrg { name, target } => {
            let (client, _) = client_for(ctx)?;
            create_org(ctx, &client, &mut prompter, name, target).await
        }

        Command::DeleteOrg { orgs, recursive } => {
            let (client, _) = client_for(ctx)?;
            delete_org(ctx, &client, &mut prompter, orgs, recursive).await
        }

        Command::Spaces => {
            let (client, _) = client_for(ctx)?;
            spaces(ctx, &client).await
        }

        Command::CreateSpace {
            name,
            organization,
            target,
        } => {
            let (client, _) = client_for(ctx)?;
            create_space(ctx, &client, &mut prompter, name, organization, target).await
        }

        Command::DeleteSpace {
            spaces,
            organization,
            recursive,
            no_warn,
        } => {
            let (client, _) = client_for(ctx)?;
            let opts = DeleteSpaceOpts {
                spaces,
                organization,
                recursive,
                no_warn,
            };
            delete_space(ctx, &client, &mut prompter, opts).await
        }

        Command::Apps => {
            let (client, _) = client_for(ctx)?;
            apps(ctx, &client).await
        }

        Command::Scale {
            app,
            memory,
            instances,
            disk,
            restart,
        } => {
            let (client, _) = client_for(ctx)?;
            let opts = ScaleOpts {
                app,
                memory,
                instances,
                disk,
                restart,
            };
            scale(ctx, &client, &mut prompter, opts).await
        }

        Command::DeleteApp { apps } => {
            let (client, _) = client_for(ctx)?;
            delete_apps(ctx, &client, &mut prompter, apps).await
        }

        Command::Completion { .. } => unreachable!("handled in dispatch"),
    }
}

/// Hint shown whenever a command needs a target that is not set.
pub(crate) const NO_TARGET_HINT: &str =
    "No API endpoint targeted. Run 'stratus target URL' first.";

/// Build an HTTP client for an API endpoint, attaching the stored token if
/// one exists.
fn build_client(api: &str) -> Result<HttpCloudClient> {
    let secrets = FileSecretStore::open_default()?;
    let token = secrets
        .get(&token_key(api))
        .context("Failed to read stored token")?;
    Ok(HttpCloudClient::new(api, token))
}

/// Load the saved target and build a client against it.
fn client_for(ctx: &Context) -> Result<(HttpCloudClient, TargetConfig)> {
    let config = ctx.store.load()?;
    let api = config
        .api
        .clone()
        .ok_or_else(|| anyhow!("{}", NO_TARGET_HINT))?;
    Ok((build_client(&api)?, config))
}

/// Given source backed by the saved target: supplies the current
/// organization and space without prompting.
pub struct TargetGiven<'a> {
    config: &'a TargetConfig,
}

impl<'a> TargetGiven<'a> {
    pub fn new(config: &'a TargetConfig) -> Self {
        Self { config }
    }
}

impl GivenSource for TargetGiven<'_> {
    fn given(&self, name: &str) -> Option<RawValue> {
        match name {
            "organization" => self.config.organization.clone().map(RawValue::Text),
            "space" => self.config.space.clone().map(RawValue::Text),
            _ => None,
        }
    }
}

/// Look up an organization by name, failing with an operator-correctable
/// message when it does not exist.
pub(crate) async fn find_organization(
    client: &dyn CloudClient,
    name: &str,
) -> Result<Organization> {
    client
        .organization_by_name(name)
        .await?
        .ok_or_else(|| anyhow!("Organization '{}' not found", name))
}

/// Look up a space by name within an organization.
pub(crate) async fn find_space(
    client: &dyn CloudClient,
    organization: &Organization,
    name: &str,
) -> Result<Space> {
    client
        .space_by_name(&organization.guid, name)
        .await?
        .ok_or_else(|| {
            anyhow!(
                "Space '{}' not found in organization '{}'",
                name,
                organization.name
            )
        })
}
