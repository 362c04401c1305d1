//! target command - Show or set the current target
//!
//! # Behavior
//!
//! - No arguments: display the current API endpoint, organization, space
//! - URL: retarget the API endpoint (clears organization and space)
//! - `-o ORG`: switch organization; interactively prompts for a space,
//!   since the old space cannot belong to the new organization
//! - `-s SPACE`: switch space within the current organization

use anyhow::{anyhow, Context as _, Result};

use crate::api::CloudClient;
use crate::cli::commands::{find_organization, find_space};
use crate::cli::Context;
use crate::resolve::{transforms, CommandSpec, Inputs, NoGiven, ParameterSpec, Prompter, Resolver};
use crate::ui::output;

/// Arguments to the target command.
#[derive(Debug, Default)]
pub struct TargetOpts {
    /// New API endpoint, already normalized.
    pub url: Option<String>,
    pub organization: Option<String>,
    pub space: Option<String>,
}

impl TargetOpts {
    /// Whether this invocation needs to talk to the platform.
    pub fn needs_client(&self) -> bool {
        self.organization.is_some() || self.space.is_some()
    }

    fn is_display(&self) -> bool {
        self.url.is_none() && self.organization.is_none() && self.space.is_none()
    }
}

fn command_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("organization", "Organization to switch to")
                .transform(transforms::resource_name()),
        )
        .param(
            ParameterSpec::new("space", "Space to switch to")
                .prompt("Space")
                .transform(transforms::resource_name()),
        )
}

/// Run the target command.
///
/// `client` is present only when switching organization or space; it is
/// already built against the effective API endpoint.
pub async fn target(
    ctx: &Context,
    client: Option<&dyn CloudClient>,
    prompter: &mut dyn Prompter,
    opts: TargetOpts,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let mut config = ctx.store.load()?;

    if opts.is_display() {
        if config.is_untargeted() {
            output::print("No target set. Run 'stratus target URL' to set one.", verbosity);
            return Ok(());
        }
        output::print(
            format!("Target:       {}", config.api.as_deref().unwrap_or("none")),
            verbosity,
        );
        output::print(
            format!(
                "Organization: {}",
                config.organization.as_deref().unwrap_or("none")
            ),
            verbosity,
        );
        output::print(
            format!("Space:        {}", config.space.as_deref().unwrap_or("none")),
            verbosity,
        );
        return Ok(());
    }

    if let Some(url) = &opts.url {
        output::print(format!("Setting target to {}", url), verbosity);
        config.api = Some(url.clone());
        // The old organization and space belong to the old endpoint.
        config.organization = None;
        config.space = None;
    }

    let spec = command_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("organization", opts.organization.clone());
    explicit.set_opt_text("space", opts.space.clone());
    // Deliberately no given source: the saved target is what we're changing.
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let org_value = resolver.resolve("organization")?;
    if let Some(org_name) = org_value.as_str() {
        let client = client.ok_or_else(|| anyhow!("switching organization requires a target"))?;
        let org = find_organization(client, org_name).await?;
        output::print(format!("Switching to organization {}", org.name), verbosity);
        config.organization = Some(org.name.clone());
        config.space = None;

        // The old space is gone with the old organization; ask for (or
        // accept) a new one.
        let space_value = resolver.resolve("space")?;
        if let Some(space_name) = space_value.as_str() {
            let space = find_space(client, &org, space_name).await?;
            output::print(format!("Switching to space {}", space.name), verbosity);
            config.space = Some(space.name);
        }
    } else if opts.space.is_some() {
        let client = client.ok_or_else(|| anyhow!("switching space requires a target"))?;
        let org_name = config
            .organization
            .clone()
            .ok_or_else(|| anyhow!("No organization targeted. Run 'stratus target -o ORG' first."))?;
        let org = find_organization(client, &org_name).await?;

        let space_value = resolver.resolve("space")?;
        if let Some(space_name) = space_value.as_str() {
            let space = find_space(client, &org, space_name).await?;
            output::print(format!("Switching to space {}", space.name), verbosity);
            config.space = Some(space.name);
        }
    }

    ctx.store
        .save(&config)
        .context("Failed to save target")?;
    Ok(())
}
