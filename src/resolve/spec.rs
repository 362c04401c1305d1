//! resolve::spec
//!
//! Parameter declarations for commands.
//!
//! # Design
//!
//! Each command declares its inputs once, at startup, as a [`CommandSpec`]:
//! an ordered set of [`ParameterSpec`]s. A spec carries direct references to
//! its transform and default producer, registered at declaration time.
//! Nothing is looked up by naming convention at call time.
//!
//! # Example
//!
//! ```
//! use stratus::resolve::spec::{CommandSpec, ParameterSpec};
//! use stratus::resolve::transforms;
//!
//! let spec = CommandSpec::new()
//!     .param(ParameterSpec::new("organization", "Space's organization"))
//!     .param(
//!         ParameterSpec::new("spaces", "Spaces to delete")
//!             .splat()
//!             .required()
//!             .transform(transforms::resource_name()),
//!     );
//!
//! assert!(spec.get("spaces").is_some());
//! assert!(spec.get("nope").is_none());
//! ```

use std::sync::Arc;

use thiserror::Error;

use super::resolver::Resolver;
use super::value::Value;
use crate::resolve::ResolveError;

/// Failure raised by a transform function.
///
/// The resolver reports these as validation errors carrying the parameter
/// name; the cause here should describe only what was wrong with the value.
#[derive(Debug, Clone, Error)]
#[error("{cause}")]
pub struct TransformError {
    /// Human-readable reason the raw value was rejected.
    pub cause: String,
}

impl TransformError {
    /// Create a transform error with the given cause.
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// A transform from one raw textual input to a resolved value.
pub type TransformFn = Arc<dyn Fn(&str) -> Result<Value, TransformError> + Send + Sync>;

/// A computed default. Receives the resolver so it can read other inputs
/// (which resolves them on demand), plus the per-element scope when the
/// parameter is being resolved inside a loop over a splat.
pub type ComputeFn =
    Arc<dyn Fn(&mut Resolver<'_>, Option<&Value>) -> Result<Value, ResolveError> + Send + Sync>;

/// How a parameter obtains a value when no source supplies one.
#[derive(Clone)]
pub enum DefaultProducer {
    /// A fixed value.
    Static(Value),
    /// A computation over other already-resolved parameters.
    Computed(ComputeFn),
}

impl std::fmt::Debug for DefaultProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultProducer::Static(v) => f.debug_tuple("Static").field(v).finish(),
            DefaultProducer::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Declaration of one logical command input.
#[derive(Clone)]
pub struct ParameterSpec {
    name: &'static str,
    description: &'static str,
    required: bool,
    splat: bool,
    secret: bool,
    ephemeral: bool,
    prompt: Option<&'static str>,
    transform: Option<TransformFn>,
    default: Option<DefaultProducer>,
}

impl ParameterSpec {
    /// Declare a parameter. Optional and scalar unless marked otherwise.
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
            splat: false,
            secret: false,
            ephemeral: false,
            prompt: None,
            transform: None,
            default: None,
        }
    }

    /// Mark the parameter required: resolution fails with `MissingInput`
    /// when no source yields a value.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the parameter as a splat: it resolves to an ordered list, each
    /// element transformed independently.
    pub fn splat(mut self) -> Self {
        self.splat = true;
        self
    }

    /// Mark the parameter secret: prompts do not echo, and raw values are
    /// redacted from error text.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Mark the parameter ephemeral ("forget"): its resolved value is
    /// excluded from the snapshot the surrounding system may persist.
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// Declare an interactive prompt with a custom message.
    pub fn prompt(mut self, message: &'static str) -> Self {
        self.prompt = Some(message);
        self
    }

    /// Register the transform applied to raw values from any source.
    pub fn transform(mut self, f: TransformFn) -> Self {
        self.transform = Some(f);
        self
    }

    /// Register a fixed default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultProducer::Static(value.into()));
        self
    }

    /// Register a computed default. The closure may call back into the
    /// resolver to read other parameters.
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Resolver<'_>, Option<&Value>) -> Result<Value, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.default = Some(DefaultProducer::Computed(Arc::new(f)));
        self
    }

    /// Parameter name (unique within a command).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human description, used as the fallback prompt message.
    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_splat(&self) -> bool {
        self.splat
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// The prompt message to use interactively. Declared message wins;
    /// required parameters without a default imply a prompt from their
    /// description.
    pub(crate) fn prompt_message(&self) -> Option<&'static str> {
        if let Some(message) = self.prompt {
            return Some(message);
        }
        if self.required && self.default.is_none() {
            return Some(self.description);
        }
        None
    }

    pub(crate) fn transform_fn(&self) -> Option<&TransformFn> {
        self.transform.as_ref()
    }

    pub(crate) fn default_producer(&self) -> Option<&DefaultProducer> {
        self.default.as_ref()
    }
}

impl std::fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("splat", &self.splat)
            .field("secret", &self.secret)
            .field("ephemeral", &self.ephemeral)
            .field("has_transform", &self.transform.is_some())
            .field("default", &self.default)
            .finish()
    }
}

/// The ordered parameter declarations of one command.
///
/// Declaration order is significant: `resolve_all` processes names in the
/// order they were declared here.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    params: Vec<ParameterSpec>,
}

impl CommandSpec {
    /// Create an empty spec set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter declaration.
    ///
    /// # Panics
    ///
    /// Panics if a parameter with the same name was already declared.
    /// Duplicate declarations are a programming error in the command, not a
    /// runtime condition.
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        assert!(
            self.get(spec.name).is_none(),
            "duplicate parameter declaration '{}'",
            spec.name
        );
        self.params.push(spec);
        self
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Position of a name in declaration order, if declared.
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Iterate declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter()
    }
}
