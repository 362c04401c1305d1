//! app commands - List, scale, and delete applications
//!
//! # Space Context
//!
//! Application commands operate in the currently targeted space; they fail
//! with a retargeting hint when no space is targeted.

use anyhow::{anyhow, Context as _, Result};

use crate::api::types::{Organization, Space};
use crate::api::{AppUpdate, CloudClient};
use crate::cli::commands::space::NO_ORG_HINT;
use crate::cli::commands::{find_organization, find_space};
use crate::cli::Context;
use crate::resolve::{
    transforms, CommandSpec, Inputs, NoGiven, ParameterSpec, Prompter, Resolver, Value,
};
use crate::ui::output;

/// Hint shown when an app command runs without a space.
const NO_SPACE_HINT: &str = "No space targeted. Run 'stratus target -s SPACE' first.";

/// Arguments to the scale command.
#[derive(Debug, Default)]
pub struct ScaleOpts {
    pub app: Option<String>,
    pub memory: Option<String>,
    pub instances: Option<String>,
    pub disk: Option<String>,
    pub restart: bool,
}

fn scale_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("app", "Application to scale")
                .required()
                .prompt("App name")
                .transform(transforms::resource_name()),
        )
        .param(
            ParameterSpec::new("memory", "Memory limit").transform(transforms::memory_limit()),
        )
        .param(
            ParameterSpec::new("instances", "Number of instances")
                .transform(transforms::positive_integer()),
        )
        .param(ParameterSpec::new("disk", "Disk quota").transform(transforms::memory_limit()))
}

fn delete_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("apps", "Applications to delete")
                .splat()
                .required()
                .transform(transforms::resource_name()),
        )
        .param(
            ParameterSpec::new("really", "Confirm the deletion")
                .ephemeral()
                .default_with(|resolver, scope| {
                    let target = scope
                        .and_then(Value::as_str)
                        .unwrap_or("the app")
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

/// Resolve the currently targeted organization and space.
async fn current_space(
    ctx: &Context,
    client: &dyn CloudClient,
) -> Result<(Organization, Space)> {
    let config = ctx.store.load()?;
    let org_name = config
        .organization
        .ok_or_else(|| anyhow!("{}", NO_ORG_HINT))?;
    let org = find_organization(client, &org_name).await?;

    let space_name = config.space.ok_or_else(|| anyhow!("{}", NO_SPACE_HINT))?;
    let space = find_space(client, &org, &space_name).await?;
    Ok((org, space))
}

/// List applications in the current space.
pub async fn apps(ctx: &Context, client: &dyn CloudClient) -> Result<()> {
    let verbosity = ctx.verbosity();
    let (_, space) = current_space(ctx, client).await?;

    let apps = client
        .apps(&space.guid)
        .await
        .context("Failed to list apps")?;
    if apps.is_empty() {
        output::print(format!("No apps in space '{}'.", space.name), verbosity);
        return Ok(());
    }

    for app in apps {
        println!(
            "{}\t{}\t{} x {}M",
            app.name, app.state, app.instances, app.memory_mb
        );
    }
    Ok(())
}

/// Change an application's memory, disk, or instance allocation.
pub async fn scale(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    opts: ScaleOpts,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let (_, space) = current_space(ctx, client).await?;

    let spec = scale_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("app", opts.app);
    explicit.set_opt_text("memory", opts.memory);
    explicit.set_opt_text("instances", opts.instances);
    explicit.set_opt_text("disk", opts.disk);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let name = resolver
        .resolve("app")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'app'"))?;
    let app = client
        .app_by_name(&space.guid, &name)
        .await?
        .ok_or_else(|| anyhow!("App '{}' not found in space '{}'", name, space.name))?;

    let update = AppUpdate {
        memory_mb: resolver.resolve("memory")?.as_int(),
        instances: resolver.resolve("instances")?.as_int(),
        disk_mb: resolver.resolve("disk")?.as_int(),
    };

    if update.is_empty() {
        output::print(
            format!(
                "{}: {} instance(s), {}M memory, {}M disk, {}",
                app.name, app.instances, app.memory_mb, app.disk_mb, app.state
            ),
            verbosity,
        );
        return Ok(());
    }

    let quota_changed = update.memory_mb.is_some() || update.disk_mb.is_some();

    output::progress_start(format!("Scaling app {}", app.name), verbosity);
    match client.update_app(&app.guid, &update).await {
        Ok(_) => output::progress_done(verbosity),
        Err(error) => {
            output::progress_failed(verbosity);
            return Err(error).context("Failed to scale app");
        }
    }

    // New quotas only take effect on a restart.
    if opts.restart && quota_changed && app.is_started() {
        output::progress_start(format!("Restarting app {}", app.name), verbosity);
        match client.restart_app(&app.guid).await {
            Ok(()) => output::progress_done(verbosity),
            Err(error) => {
                output::progress_failed(verbosity);
                return Err(error).context("Failed to restart app");
            }
        }
    }
    Ok(())
}

/// Delete one or more applications, confirming each independently.
pub async fn delete_apps(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    names: Vec<String>,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let (_, space) = current_space(ctx, client).await?;

    let spec = delete_spec();
    let mut explicit = Inputs::new();
    explicit.set_items("apps", names);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let names: Vec<String> = resolver
        .resolve("apps")?
        .into_list()
        .into_iter()
        .filter_map(Value::into_string)
        .collect();

    for name in &names {
        let really = resolver
            .resolve_for("really", &Value::from(name.as_str()))?
            .as_bool()
            .unwrap_or(false);
        if !really {
            continue;
        }

        let app = match client.app_by_name(&space.guid, name).await {
            Ok(Some(app)) => app,
            Ok(None) => {
                output::error(format!(
                    "App '{}' not found in space '{}'",
                    name, space.name
                ));
                continue;
            }
            Err(error) => {
                output::error(error);
                continue;
            }
        };

        output::progress_start(format!("Deleting app {}", app.name), verbosity);
        match client.delete_app(&app.guid).await {
            Ok(()) => output::progress_done(verbosity),
            Err(error) => {
                output::progress_failed(verbosity);
                output::error(error);
            }
        }
    }
    Ok(())
}
