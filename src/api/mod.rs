//! api
//!
//! Client for the Stratus control-plane API.
//!
//! # Modules
//!
//! - [`traits`] - The `CloudClient` trait and error taxonomy
//! - [`types`] - Resource models (organizations, spaces, apps, users)
//! - [`http`] - HTTP implementation used by the CLI
//! - [`mock`] - Deterministic in-memory implementation for tests
//!
//! # Design
//!
//! Commands depend only on the trait, so tests swap in the mock without
//! touching command logic. The client is invoked strictly after input
//! resolution; nothing in `resolve` performs network I/O.

pub mod http;
pub mod mock;
pub mod traits;
pub mod types;

pub use http::HttpCloudClient;
pub use mock::MockCloudClient;
pub use traits::{ApiError, AppUpdate, CloudClient};
