//! Stratus - CLI client for the Stratus application platform
//!
//! Stratus is a single-binary tool for operating a platform-as-a-service
//! control plane: targeting an API endpoint, logging in, and creating,
//! deleting, and scaling organizations, spaces, and applications.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to commands)
//! - [`resolve`] - Input resolution: precedence, memoization, confirmation gating
//! - [`api`] - Client for the control-plane API (HTTP and mock implementations)
//! - [`config`] - Persisted target state (API endpoint, organization, space)
//! - [`secrets`] - Bearer-token storage
//! - [`ui`] - Prompting and output utilities
//!
//! # Correctness Invariants
//!
//! Stratus maintains the following invariants:
//!
//! 1. Command inputs resolve through a single precedence order and are
//!    never prompted for twice in one invocation
//! 2. Destructive operations are individually confirmation-gated per target
//! 3. Secret values never reach stdout, stderr, or error messages

pub mod api;
pub mod cli;
pub mod config;
pub mod resolve;
pub mod secrets;
pub mod ui;
