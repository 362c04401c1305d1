//! login / logout commands - Manage the session token
//!
//! # Security
//!
//! The password is a secret, ephemeral input: prompted without echo, never
//! cached for persistence, never printed. These functions only ever print
//! the email and the endpoint, never credentials or tokens.

use anyhow::{anyhow, bail, Context as _, Result};

use crate::api::{ApiError, CloudClient};
use crate::cli::commands::NO_TARGET_HINT;
use crate::cli::Context;
use crate::config::TargetConfig;
use crate::resolve::{transforms, CommandSpec, Inputs, NoGiven, ParameterSpec, Prompter, Resolver};
use crate::secrets::{token_key, SecretStore};
use crate::ui::output;

fn command_spec() -> CommandSpec {
    CommandSpec::new()
        .param(
            ParameterSpec::new("email", "Account email")
                .required()
                .prompt("Email")
                .transform(transforms::email()),
        )
        .param(
            ParameterSpec::new("password", "Account password")
                .required()
                .secret()
                .ephemeral()
                .prompt("Password"),
        )
}

/// Run the login command: exchange credentials for a bearer token and
/// store it for the current target.
pub async fn login(
    ctx: &Context,
    client: &dyn CloudClient,
    prompter: &mut dyn Prompter,
    secrets: &dyn SecretStore,
    config: &TargetConfig,
    email: Option<String>,
) -> Result<()> {
    let verbosity = ctx.verbosity();
    let api = config
        .api
        .as_deref()
        .ok_or_else(|| anyhow!("{}", NO_TARGET_HINT))?;

    let spec = command_spec();
    let mut explicit = Inputs::new();
    explicit.set_opt_text("email", email);
    let mut resolver = Resolver::new(&spec, explicit, &NoGiven, prompter, ctx.resolve_options());

    let email = resolver
        .resolve("email")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'email'"))?;
    let password = resolver
        .resolve("password")?
        .into_string()
        .ok_or_else(|| anyhow!("missing required input 'password'"))?;

    output::progress_start("Authenticating", verbosity);
    let token = match client.login(&email, &password).await {
        Ok(token) => token,
        Err(ApiError::AuthFailed(reason)) => {
            output::progress_failed(verbosity);
            bail!("Login failed: {}", reason);
        }
        Err(other) => {
            output::progress_failed(verbosity);
            return Err(other).context("Login failed");
        }
    };
    output::progress_done(verbosity);

    secrets
        .set(&token_key(api), &token.access_token)
        .context("Failed to store session token")?;
    output::print(format!("Logged in as {}.", email), verbosity);
    Ok(())
}

/// Run the logout command: discard the stored token for the current
/// target.
pub fn logout(ctx: &Context, secrets: &dyn SecretStore, config: &TargetConfig) -> Result<()> {
    let verbosity = ctx.verbosity();
    let api = config
        .api
        .as_deref()
        .ok_or_else(|| anyhow!("{}", NO_TARGET_HINT))?;

    secrets
        .delete(&token_key(api))
        .context("Failed to remove session token")?;
    output::print(format!("Logged out of {}.", api), verbosity);
    Ok(())
}
