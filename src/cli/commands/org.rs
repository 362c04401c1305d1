//! org commands - List, create, and delete organizations
//!
//! # Batch Deletes
//!
//! `delete-org` confirms each organization independently, and one
//! organization's failure never aborts the rest of the batch. An
//! organization that still contains spaces produces a hint to rerun with
//! `--recursive`.

use anyhow::{anyhow, Context as _, Result};

use crate::api::{ApiError, CloudClient};
use crate::cli::Context;
use crate::resolve::{
    transforms, CommandSpec, Inputs, NoGiven, ParameterSpec, Prompter, Resolver, Value,
};
use crate::ui::output;

fn create_spec() -> CommandSpec {
    CommandSpec::new().param(
        ParameterSpec::new("name", "Organization name")
            .required()
            .prompt("Organization name")
            .transform(transforms::resource_name()),
    )
}

fn delete_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("orgs", "Organizations to delete")
                .splat()
                .required()
                .transform(transforms::resource_name()),
        )
        .param(ParameterSpec::new("recursive", "Delete recursively").ephemeral())
        .param(
            ParameterSpec::new("really", "Confirm the deletion")
                .ephemeral()
                .default_with(|resolver, scope| {
                    let target = scope
                        .and_then(Value::as_str)
                        .unwrap_or("the organization")
                        .to_string();
                    let yes = if resolver.forced() {
                        true
                    } else {
                        resolver.confirm(
                            &format!("Really delete organization {}?", target),
                            false,
                        )?
                    };
                    Ok(Value::Bool(yes))
                }),
        )
}

/// List organizations, marking the currently targeted one.
pub async fn orgs(ctx: &Context, client: &dyn CloudClient) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = ctx.store.load()?;

    let orgs = client
        .organizations()
        .await
        .context("Failed to list organizations")?;
    if orgs.is_empty() {
        output::print("No organizations.", verbosity);
        return Ok(());
    }

    for org in orgs {
        let marker = if config.organization.as_deref() == Some(org.name.as_str()) {
            "* "
        } else {
            "  "
        };
        println!("{}{}", marker, org.name);
    }
    Ok(())
}

/// Create an organization, optionally targeting it afterwards.
pub async fn create_org(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    name: Option<String>,
    target: bool,
) -> Result<()> {
    let verbosity = ctx.verbosity();

    let spec = create_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("name", name);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let name = resolver
        .resolve("name")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'name'"))?;

    output::progress_start(format!("Creating organization {}", name), verbosity);
    let org = match client.create_organization(&name).await {
        Ok(org) => {
            output::progress_done(verbosity);
            org
        }
        Err(error) => {
            output::progress_failed(verbosity);
            return Err(error).context("Failed to create organization");
        }
    };

    if target {
        let mut config = ctx.store.load()?;
        config.organization = Some(org.name.clone());
        config.space = None;
        ctx.store.save(&config).context("Failed to save target")?;
        output::print(format!("Now targeting organization {}.", org.name), verbosity);
    }
    Ok(())
}

/// Delete one or more organizations, confirming each independently.
pub async fn delete_org(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    names: Vec<String>,
    recursive: bool,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let config = ctx.store.load()?;

    let spec = delete_spec();
    let mut explicit = Inputs::new();
    explicit.set_items("orgs", names);
    explicit.set_flag("recursive", recursive);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let names: Vec<String> = resolver
        .resolve("orgs")?
        .into_list()
        .into_iter()
        .filter_map(Value::into_string)
        .collect();
    let recursive = resolver.resolve("recursive")?.as_bool().unwrap_or(false);

    let mut deleted_current = false;

    for name in &names {
        let really = resolver
            .resolve_for("really", &Value::from(name.as_str()))?
            .as_bool()
            .unwrap_or(false);
        if !really {
            continue;
        }

        let org = match client.organization_by_name(name).await {
            Ok(Some(org)) => org,
            Ok(None) => {
                output::error(format!("Organization '{}' not found", name));
                continue;
            }
            Err(error) => {
                output::error(error);
                continue;
            }
        };

        output::progress_start(format!("Deleting organization {}", org.name), verbosity);
        match client.delete_organization(&org.guid, recursive).await {
            Ok(()) => {
                output::progress_done(verbosity);
                deleted_current |= config.organization.as_deref() == Some(name.as_str());
            }
            Err(ApiError::NotEmpty { description }) => {
                output::progress_failed(verbosity);
                output::error(description);
                output::print(
                    "If you want to delete the organization along with everything in it, \
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

    if deleted_current {
        output::warn(
            "The organization you were targeting has now been deleted. \
             Use 'stratus target -o ORG' to target a different one.",
            verbosity,
        );
    }
    Ok(())
}
