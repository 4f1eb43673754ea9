//! Request-scoped configuration overrides.
//!
//! # Data Flow
//! ```text
//! Context (bound Config) + Option<&Ingress>
//!     → gateway.rs (copy base IstioConfig, apply annotations)
//!     → transient IstioConfig for this ingress only
//! ```

pub mod gateway;
pub mod ingress;

pub use gateway::{apply_gateway_overrides, resolve_gateway_config, OverrideError};
pub use ingress::{Ingress, ObjectMeta};
