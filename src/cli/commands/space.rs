//! space commands - List, create, and delete spaces
//!
//! # Organization Context
//!
//! Every space command operates within an organization. The organization
//! resolves from the `-o` flag first, then from the saved target (a
//! "given" value), so `stratus delete-space staging` works without
//! naming the organization explicitly.
//!
//! # Batch Deletes
//!
//! `delete-space` confirms each space independently; answering "no" for
//! one space skips it while the rest of the batch proceeds, and an API
//! failure on one space never aborts the others.

use anyhow::{anyhow, Context as _, Result};

use crate::api::{ApiError, CloudClient};
use crate::cli::commands::{find_organization, TargetGiven};
use crate::cli::Context;
use crate::resolve::{
    transforms, CommandSpec, Inputs, ParameterSpec, Prompter, Resolver, Value,
};
use crate::ui::output;

/// Hint shown when a space command runs without an organization.
pub(crate) const NO_ORG_HINT: &str =
    "No organization targeted. Run 'stratus target -o ORG' first.";

/// Arguments to the delete-space command.
#[derive(Debug, Default)]
pub struct DeleteSpaceOpts {
    pub spaces: Vec<String>,
    pub organization: Option<String>,
    pub recursive: bool,
    pub no_warn: bool,
}

fn create_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("organization", "Space's organization")
                .transform(transforms::resource_name()),
        )
        .param(
            ParameterSpec::new("name", "Space name")
                .required()
                .prompt("Space name")
                .transform(transforms::resource_name()),
        )
}

fn delete_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("organization", "Space's organization")
                .transform(transforms::resource_name()),
        )
        .param(
            ParameterSpec::new("spaces", "Spaces to delete")
                .splat()
                .required()
                .transform(transforms::resource_name()),
        )
        .param(ParameterSpec::new("recursive", "Delete recursively").ephemeral())
        .param(
            ParameterSpec::new("warn", "Show warning if it was the last space")
                .default_value(true),
        )
        .param(
            ParameterSpec::new("really", "Confirm the deletion")
                .ephemeral()
                .default_with(|resolver, scope| {
                    let target = scope
                        .and_then(Value::as_str)
                        .unwrap_or("the space")
                        .to_string();
                    let yes = if resolver.forced() {
                        true
                    } else {
                        resolver.confirm(&format!("Really delete {}?", target), false)?
                    };
                    Ok(Value::Bool(yes))
                }),
        )
}

/// List spaces in the current organization, marking the targeted one.
pub async fn spaces(ctx: &Context, client: &dyn CloudClient) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = ctx.store.load()?;

    let org_name = config
        .organization
        .clone()
        .ok_or_else(|| anyhow!("{}", NO_ORG_HINT))?;
    let org = find_organization(client, &org_name).await?;

    let spaces = client
        .spaces(&org.guid)
        .await
        .context("Failed to list spaces")?;
    if spaces.is_empty() {
        output::print(
            format!("No spaces in organization '{}'.", org.name),
            verbosity,
        );
        return Ok(());
    }

    for space in spaces {
        let marker = if config.space.as_deref() == Some(space.name.as_str()) {
            "* "
        } else {
            "  "
        };
        println!("{}{}", marker, space.name);
    }
    Ok(())
}

/// Create a space, optionally targeting it afterwards.
pub async fn create_space(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    name: Option<String>,
    organization: Option<String>,
    target: bool,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = ctx.store.load()?;

    let spec = create_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("name", name);
    explicit.set_opt_text("organization", organization);
    let given = TargetGiven::new(&config);
    let mut resolver = Resolver::new(&spec, explicit, &given, prompter, ctx.resolve_options());

    let org_name = resolver
        .resolve("organization")?
        .into_string()
        .ok_or_else(|| anyhow!("{}", NO_ORG_HINT))?;
    let org = find_organization(client, &org_name).await?;

    let name = resolver
        .resolve("name")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'name'"))?;

    output::progress_start(
        format!("Creating space {} in organization {}", name, org.name),
        verbosity,
    );
    let space = match client.create_space(&org.guid, &name).await {
        Ok(space) => {
            output::progress_done(verbosity);
            space
        }
        Err(error) => {
            output::progress_failed(verbosity);
            return Err(error).context("Failed to create space");
        }
    };

    if target {
        let mut config = config;
        config.organization = Some(org.name.clone());
        config.space = Some(space.name.clone());
        ctx.store.save(&config).context("Failed to save target")?;
        output::print(format!("Now targeting space {}.", space.name), verbosity);
    }
    Ok(())
}

/// Delete one or more spaces, confirming each independently.
pub async fn delete_space(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    opts: DeleteSpaceOpts,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = ctx.store.load()?;

    let spec = delete_spec();
    let mut explicit = Inputs::new();
    explicit.set_items("spaces", opts.spaces);
    explicit.set_opt_text("organization", opts.organization);
    explicit.set_flag("recursive", opts.recursive);
    if opts.no_warn {
        explicit.set_flag("warn", false);
    }
    let given = TargetGiven::new(&config);
    let mut resolver = Resolver::new(&spec, explicit, &given, prompter, ctx.resolve_options());

    let org_name = resolver
        .resolve("organization")?
        .into_string()
        .ok_or_else(|| anyhow!("{}", NO_ORG_HINT))?;
    let org = find_organization(client, &org_name).await?;

    let names: Vec<String> = resolver
        .resolve("spaces")?
        .into_list()
        .into_iter()
        .filter_map(Value::into_string)
        .collect();
    let recursive = resolver.resolve("recursive")?.as_bool().unwrap_or(false);

    // Secret and ephemeral inputs are excluded from this snapshot, so it
    // is safe to show.
    output::debug(
        format!("resolved inputs: {:?}", resolver.persistable()),
        verbosity,
    );

    let mut deleted_current = false;

    for name in &names {
        let really = resolver
            .resolve_for("really", &Value::from(name.as_str()))?
            .as_bool()
            .unwrap_or(false);
        if !really {
            continue;
        }

        let space = match client.space_by_name(&org.guid, name).await {
            Ok(Some(space)) => space,
            Ok(None) => {
                output::error(format!(
                    "Space '{}' not found in organization '{}'",
                    name, org.name
                ));
                continue;
            }
            Err(error) => {
                output::error(error);
                continue;
            }
        };

        output::progress_start(format!("Deleting space {}", space.name), verbosity);
        match client.delete_space(&space.guid, recursive).await {
            Ok(()) => {
                output::progress_done(verbosity);
                deleted_current |= config.space.as_deref() == Some(name.as_str());
            }
            Err(ApiError::NotEmpty { description }) => {
                output::progress_failed(verbosity);
                output::error(description);
                output::print(
                    "If you want to delete the space along with all dependent objects, \
                     rerun the command with the '--recursive' flag.",
                    verbosity,
                );
            }
            Err(error) => {
                output::progress_failed(verbosity);
                output::error(error);
            }
        }
    }

    let warn = resolver.resolve("warn")?.as_bool().unwrap_or(true);
    if warn {
        let remaining = client.spaces(&org.guid).await?;
        if remaining.is_empty() {
            output::warn(
                format!(
                    "You have no spaces remaining in organization '{}'. \
                     Create one with 'stratus create-space'.",
                    org.name
                ),
                verbosity,
            );
        }
    }

    if deleted_current {
        output::warn(
            "The space that you were targeting has now been deleted. \
             Use 'stratus target -s SPACE' to target a different one.",
            verbosity,
        );
    }
    Ok(())
}
