//! resolve
//!
//! The command input-resolution and confirmation engine.
//!
//! # Overview
//!
//! Every command declares its inputs once as a [`CommandSpec`] and resolves
//! them on demand through a [`Resolver`] created fresh for the invocation.
//! Resolution applies a strict precedence (explicit value, contextual
//! "given" value, interactive prompt, default), memoizes each resolved
//! value for the lifetime of the invocation, and gates destructive work
//! behind per-element confirmation.
//!
//! # Modules
//!
//! - [`value`] - Raw and resolved value representations
//! - [`spec`] - Parameter declarations with registered transforms/defaults
//! - [`resolver`] - The resolver: precedence, memoization, confirmation
//! - [`transforms`] - Stock transforms (sizes, counts, names, email)
//!
//! # Example
//!
//! ```
//! use stratus::resolve::{
//!     CommandSpec, Inputs, NoGiven, ParameterSpec, ResolveOptions, Resolver,
//! };
//! use stratus::resolve::transforms;
//! use stratus::ui::prompts::ScriptedPrompter;
//!
//! let spec = CommandSpec::new().param(
//!     ParameterSpec::new("memory", "Memory limit").transform(transforms::memory_limit()),
//! );
//!
//! let mut explicit = Inputs::new();
//! explicit.set_text("memory", "2G");
//!
//! let mut prompter = ScriptedPrompter::new(&[]);
//! let mut resolver = Resolver::new(
//!     &spec,
//!     explicit,
//!     &NoGiven,
//!     &mut prompter,
//!     ResolveOptions::default(),
//! );
//!
//! let memory = resolver.resolve("memory").unwrap();
//! assert_eq!(memory.as_int(), Some(2048));
//! ```

pub mod resolver;
pub mod spec;
pub mod transforms;
pub mod value;

pub use resolver::{
    GivenSource, Inputs, NoGiven, PromptError, PromptOptions, Prompter, ResolveError,
    ResolveOptions, Resolver, MAX_PROMPT_ATTEMPTS,
};
pub use spec::{CommandSpec, ParameterSpec, TransformError};
pub use value::{RawValue, Value};
