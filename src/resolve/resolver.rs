//! resolve::resolver
//!
//! Demand-driven input resolution for one command invocation.
//!
//! # Precedence
//!
//! `resolve` consults sources in strict order, first success wins:
//!
//! 1. The per-invocation memo (a resolved name is never recomputed)
//! 2. An explicit flag/argument value, through the spec's transform
//! 3. A "given" contextual value (e.g. the current organization), through
//!    the same transform
//! 4. An interactive prompt, at most once per name, only outside forced and
//!    non-interactive modes
//! 5. The declared default, static or computed from other inputs
//! 6. Failure (`MissingInput`) for required parameters; `Absent` otherwise
//!
//! The resolver never retries across sources: once a source yields a value
//! that the transform rejects, the error propagates.
//!
//! # Scoped resolution
//!
//! Batch commands confirm destructive work per element. `resolve_for`
//! resolves the same parameter independently once per scope value, so a
//! single `really` declaration yields one confirmation per space in
//! `delete-space space-a space-b`.
//!
//! # Ownership
//!
//! A `Resolver` is created fresh per invocation, exclusively owned by it,
//! and discarded when the invocation ends. Nothing here persists across
//! commands; cross-invocation state (the remembered target) belongs to the
//! `config` module.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::spec::{CommandSpec, DefaultProducer, ParameterSpec};
use super::value::{RawValue, Value};

/// How many times an empty answer to a required prompt is re-asked before
/// the parameter is treated as missing.
pub const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Placeholder used wherever a secret raw value would otherwise appear.
const REDACTED: &str = "<redacted>";

/// Errors from input resolution.
///
/// None of these are recoverable inside the resolver; the invoking command
/// decides whether a failure aborts the invocation or skips one element of
/// a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A required parameter had no value from any source.
    #[error("missing required input '{name}'")]
    MissingInput { name: String },

    /// A supplied or derived raw value was rejected.
    #[error("invalid value for '{name}': {cause}")]
    Validation { name: String, cause: String },

    /// One element of a splat was rejected. Carries the element's position
    /// and raw input so the operator can correct it.
    #[error("invalid value for '{name}' at position {index} ('{raw}'): {cause}")]
    InvalidElement {
        name: String,
        index: usize,
        raw: String,
        cause: String,
    },

    /// The parameter name is not declared by this command.
    #[error("unknown parameter '{name}'")]
    Unknown { name: String },

    /// A computed default re-entered a parameter already being resolved.
    #[error("circular dependency while resolving '{name}'")]
    Cycle { name: String },
}

impl ResolveError {
    /// The parameter this error names.
    pub fn parameter(&self) -> &str {
        match self {
            ResolveError::MissingInput { name }
            | ResolveError::Validation { name, .. }
            | ResolveError::InvalidElement { name, .. }
            | ResolveError::Unknown { name }
            | ResolveError::Cycle { name } => name,
        }
    }
}

/// Errors from the prompt collaborator.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt i/o error: {0}")]
    Io(String),
}

/// Options for one prompt call.
#[derive(Debug, Clone, Copy)]
pub struct PromptOptions<'a> {
    /// Default answer shown to the operator, if any.
    pub default: Option<&'a str>,
    /// When false the answer must not be echoed to the terminal.
    pub echo: bool,
}

/// The interactive prompt collaborator.
///
/// `Ok(None)` means end-of-input (the operator closed stdin).
pub trait Prompter {
    fn prompt(
        &mut self,
        message: &str,
        options: &PromptOptions<'_>,
    ) -> Result<Option<String>, PromptError>;
}

/// The "given" source: contextual values that suppress prompting without
/// being explicit user input (e.g. the currently targeted organization).
pub trait GivenSource {
    fn given(&self, name: &str) -> Option<RawValue>;
}

/// A given source that supplies nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGiven;

impl GivenSource for NoGiven {
    fn given(&self, _name: &str) -> Option<RawValue> {
        None
    }
}

/// Explicit values parsed from the command line for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    values: HashMap<String, RawValue>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a textual flag value.
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), RawValue::Text(value.into()));
        self
    }

    /// Record a textual flag value when present.
    pub fn set_opt_text(&mut self, name: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.set_text(name, value);
        }
        self
    }

    /// Record a boolean switch.
    pub fn set_flag(&mut self, name: &str, value: bool) -> &mut Self {
        self.values.insert(name.to_string(), RawValue::Bool(value));
        self
    }

    /// Record splat elements. An empty list counts as "not supplied" so
    /// zero positional arguments fall through to prompts and defaults.
    pub fn set_items(&mut self, name: &str, items: Vec<String>) -> &mut Self {
        if !items.is_empty() {
            self.values.insert(name.to_string(), RawValue::Items(items));
        }
        self
    }

    fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }
}

/// Invocation-wide resolution settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Forced mode: confirmations are assumed answered "yes" and prompting
    /// is suppressed.
    pub force: bool,
    /// Whether interactive prompting is permitted at all.
    pub interactive: bool,
}

type CacheKey = (String, Option<String>);

/// Resolves a command's declared parameters on demand.
///
/// Exclusively owned by one invocation; never shared across threads.
pub struct Resolver<'a> {
    specs: &'a CommandSpec,
    explicit: Inputs,
    given: &'a dyn GivenSource,
    prompter: &'a mut dyn Prompter,
    force: bool,
    interactive: bool,
    cache: HashMap<CacheKey, Value>,
    in_flight: Vec<CacheKey>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for one invocation.
    pub fn new(
        specs: &'a CommandSpec,
        explicit: Inputs,
        given: &'a dyn GivenSource,
        prompter: &'a mut dyn Prompter,
        options: ResolveOptions,
    ) -> Self {
        Self {
            specs,
            explicit,
            given,
            prompter,
            force: options.force,
            interactive: options.interactive && !options.force,
            cache: HashMap::new(),
            in_flight: Vec::new(),
        }
    }

    /// Whether this invocation runs in forced mode.
    pub fn forced(&self) -> bool {
        self.force
    }

    /// Whether interactive prompting is permitted.
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    /// Resolve a parameter by name.
    pub fn resolve(&mut self, name: &str) -> Result<Value, ResolveError> {
        self.resolve_scoped(name, None)
    }

    /// Resolve a parameter independently for one element of a batch.
    ///
    /// The scope value is passed to the spec's computed default and keys the
    /// memo, so each element gets its own resolution exactly once.
    pub fn resolve_for(&mut self, name: &str, scope: &Value) -> Result<Value, ResolveError> {
        self.resolve_scoped(name, Some(scope))
    }

    /// Resolve several parameters in declaration order, stopping at the
    /// first failure.
    pub fn resolve_all(&mut self, names: &[&str]) -> Result<BTreeMap<String, Value>, ResolveError> {
        let mut ordered = Vec::with_capacity(names.len());
        for name in names {
            match self.specs.position(name) {
                Some(position) => ordered.push((position, *name)),
                None => {
                    return Err(ResolveError::Unknown {
                        name: (*name).to_string(),
                    })
                }
            }
        }
        ordered.sort_by_key(|(position, _)| *position);

        let mut resolved = BTreeMap::new();
        for (_, name) in ordered {
            let value = self.resolve(name)?;
            resolved.insert(name.to_string(), value);
        }
        Ok(resolved)
    }

    /// Ask a yes/no question, honoring invocation modes.
    ///
    /// Forced mode answers "yes" without asking; non-interactive mode
    /// answers with the default. Intended for use inside computed defaults
    /// that explicitly declare interaction (the `really` pattern).
    pub fn confirm(&mut self, message: &str, default_yes: bool) -> Result<bool, ResolveError> {
        if self.force {
            return Ok(true);
        }
        if !self.interactive {
            return Ok(default_yes);
        }

        let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
        let question = format!("{} {}", message, suffix);
        let options = PromptOptions {
            default: Some(if default_yes { "y" } else { "n" }),
            echo: true,
        };

        for _ in 0..MAX_PROMPT_ATTEMPTS {
            let answer = match self.prompter.prompt(&question, &options) {
                Ok(Some(answer)) => answer,
                // EOF and prompt failures fall back to the default answer.
                Ok(None) | Err(_) => return Ok(default_yes),
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default_yes),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
        Ok(default_yes)
    }

    /// The resolved values the surrounding system may persist or log:
    /// unscoped entries, minus secret and ephemeral parameters.
    pub fn persistable(&self) -> BTreeMap<String, Value> {
        self.cache
            .iter()
            .filter(|((_, scope), _)| scope.is_none())
            .filter_map(|((name, _), value)| {
                let spec = self.specs.get(name)?;
                if spec.is_secret() || spec.is_ephemeral() {
                    return None;
                }
                Some((name.clone(), value.clone()))
            })
            .collect()
    }

    fn resolve_scoped(&mut self, name: &str, scope: Option<&Value>) -> Result<Value, ResolveError> {
        let specs = self.specs;
        let spec = specs.get(name).ok_or_else(|| ResolveError::Unknown {
            name: name.to_string(),
        })?;

        let key = (spec.name().to_string(), scope.map(Value::scope_token));
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }
        if self.in_flight.contains(&key) {
            return Err(ResolveError::Cycle {
                name: name.to_string(),
            });
        }

        self.in_flight.push(key.clone());
        let result = self.resolve_uncached(spec, scope);
        self.in_flight.pop();

        let value = result?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }

    fn resolve_uncached(
        &mut self,
        spec: &ParameterSpec,
        scope: Option<&Value>,
    ) -> Result<Value, ResolveError> {
        // Explicit flag/argument value.
        if let Some(raw) = self.explicit.get(spec.name()).cloned() {
            return self.apply_raw(spec, &raw);
        }

        // Contextual "given" value.
        if let Some(raw) = self.given.given(spec.name()) {
            return self.apply_raw(spec, &raw);
        }

        // Interactive prompt, at most once per name.
        if self.interactive {
            if let Some(message) = spec.prompt_message() {
                return self.prompt_value(spec, message);
            }
        }

        // Declared default.
        if let Some(producer) = spec.default_producer() {
            let value = match producer {
                DefaultProducer::Static(value) => value.clone(),
                DefaultProducer::Computed(compute) => compute(self, scope)?,
            };
            if value.is_absent() && spec.is_required() {
                return Err(self.missing(spec));
            }
            return Ok(value);
        }

        if spec.is_required() {
            Err(self.missing(spec))
        } else {
            Ok(Value::Absent)
        }
    }

    fn apply_raw(&self, spec: &ParameterSpec, raw: &RawValue) -> Result<Value, ResolveError> {
        if spec.is_splat() {
            let items: Vec<&str> = match raw {
                RawValue::Items(items) => items.iter().map(String::as_str).collect(),
                RawValue::Text(text) => vec![text.as_str()],
                RawValue::Bool(_) => {
                    return Err(self.validation(spec, "expected a list of values"))
                }
            };
            let mut resolved = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                resolved.push(self.transform_element(spec, item, Some(index))?);
            }
            return Ok(Value::List(resolved));
        }

        match raw {
            RawValue::Bool(value) => Ok(Value::Bool(*value)),
            RawValue::Text(text) => self.transform_element(spec, text, None),
            RawValue::Items(items) if items.len() == 1 => {
                self.transform_element(spec, &items[0], None)
            }
            RawValue::Items(_) => Err(self.validation(spec, "expected a single value")),
        }
    }

    fn transform_element(
        &self,
        spec: &ParameterSpec,
        raw: &str,
        index: Option<usize>,
    ) -> Result<Value, ResolveError> {
        let Some(transform) = spec.transform_fn() else {
            return Ok(Value::Str(raw.to_string()));
        };

        transform(raw).map_err(|error| {
            let cause = if spec.is_secret() {
                "value rejected".to_string()
            } else {
                error.cause
            };
            match index {
                Some(index) => ResolveError::InvalidElement {
                    name: spec.name().to_string(),
                    index,
                    raw: if spec.is_secret() {
                        REDACTED.to_string()
                    } else {
                        raw.to_string()
                    },
                    cause,
                },
                None => ResolveError::Validation {
                    name: spec.name().to_string(),
                    cause,
                },
            }
        })
    }

    fn prompt_value(
        &mut self,
        spec: &ParameterSpec,
        message: &str,
    ) -> Result<Value, ResolveError> {
        let options = PromptOptions {
            default: None,
            echo: !spec.is_secret(),
        };

        for _ in 0..MAX_PROMPT_ATTEMPTS {
            let answer = match self.prompter.prompt(message, &options) {
                Ok(Some(answer)) => answer,
                // EOF or a broken terminal: the input is simply unavailable.
                Ok(None) | Err(_) => return Err(self.missing(spec)),
            };

            // Secrets are taken verbatim; whitespace can be significant.
            let answer = if spec.is_secret() {
                answer
            } else {
                answer.trim().to_string()
            };

            if answer.is_empty() {
                if spec.is_required() {
                    continue;
                }
                return Ok(Value::Absent);
            }

            return if spec.is_splat() {
                Ok(Value::List(vec![self.transform_element(spec, &answer, Some(0))?]))
            } else {
                self.transform_element(spec, &answer, None)
            };
        }

        Err(self.missing(spec))
    }

    fn missing(&self, spec: &ParameterSpec) -> ResolveError {
        ResolveError::MissingInput {
            name: spec.name().to_string(),
        }
    }

    fn validation(&self, spec: &ParameterSpec, cause: &str) -> ResolveError {
        ResolveError::Validation {
            name: spec.name().to_string(),
            cause: cause.to_string(),
        }
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("force", &self.force)
            .field("interactive", &self.interactive)
            .field("resolved", &self.cache.len())
            .finish()
    }
}
