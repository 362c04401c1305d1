//! passwd command - Update a user's password
//!
//! # Behavior
//!
//! The target user defaults to the current user; naming anyone else fails,
//! since operators can only change their own password. The current, new,
//! and verify passwords are secret, ephemeral inputs prompted without
//! echo.

use anyhow::{anyhow, bail, Context as _, Result};

use crate::api::CloudClient;
use crate::cli::Context;
use crate::resolve::{transforms, CommandSpec, Inputs, NoGiven, ParameterSpec, Prompter, Resolver};
use crate::ui::output;

/// Shortest password the platform accepts.
const MIN_PASSWORD_LEN: usize = 6;

fn command_spec() -> CommandSpec {
    CommandSpec::new()
        .param(ParameterSpec::new("user", "User to update").transform(transforms::email()))
        .param(
            ParameterSpec::new("password", "Current password")
                .required()
                .secret()
                .ephemeral()
                .prompt("Current Password"),
        )
        .param(
            ParameterSpec::new("new_password", "New password")
                .required()
                .secret()
                .ephemeral()
                .prompt("New Password"),
        )
        .param(
            ParameterSpec::new("verify", "Repeat new password")
                .required()
                .secret()
                .ephemeral()
                .prompt("Verify Password"),
        )
}

/// Run the passwd command.
pub async fn passwd(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    user: Option<String>,
) -> Result<()> {
    let verbosity = ctx.verbosity();

    let spec = command_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("user", user);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let current = client
        .current_user()
        .await
        .context("Failed to fetch current user")?;

    let user = resolver.resolve("user")?;
    if let Some(email) = user.as_str() {
        if email != current.email {
            bail!("You can only change your own password.");
        }
    }

    let password = resolver
        .resolve("password")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'password'"))?;
    let new_password = resolver
        .resolve("new_password")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'new_password'"))?;
    let verify = resolver
        .resolve("verify")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'verify'"))?;

    if new_password != verify {
        bail!("Passwords don't match.");
    }
    if new_password.len() < MIN_PASSWORD_LEN {
        bail!(
            "New password must be at least {} characters.",
            MIN_PASSWORD_LEN
        );
    }

    output::progress_start("Changing password", verbosity);
    match client
        .change_password(&current.guid, &new_password, &password)
        .await
    {
        Ok(()) => {
            output::progress_done(verbosity);
            Ok(())
        }
        Err(error) => {
            output::progress_failed(verbosity);
            Err(error).context("Failed to change password")
        }
    }
}
