//! Context-scoped configuration store for an ingress controller.
//!
//! Configuration domains are decoded from raw sources into typed values,
//! cached per domain, and published to request code as an immutable
//! [`store::Config`] bound to a [`store::Context`] or an HTTP request.

// Core
pub mod domains;
pub mod overrides;
pub mod source;
pub mod store;

// Outer surfaces
pub mod http;
pub mod settings;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use lifecycle::Shutdown;
pub use store::{Config, Context, Store};
