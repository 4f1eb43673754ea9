//! Configuration store subsystem.
//!
//! # Data Flow
//! ```text
//! (domain, RawBlock) from a source
//!     → registry.rs (decode with the domain's decoder)
//!     → atomic swap of that domain's Arc value
//!     → post-update callbacks
//!
//! Store::load()
//!     → registry snapshot per domain
//!     → Config { istio, network } (immutable)
//!     → context.rs binds it to a Context / request
//! ```
//!
//! # Design Decisions
//! - Domains are typed: `ConfigDomain::NAME` keys the registry, so reads
//!   go through the domain type rather than a runtime cast
//! - Failed decodes never reach readers; the last good value stays
//! - Cross-domain snapshots are not atomic; domains are independent

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod store;

pub use config::Config;
pub use context::{from_context, to_context, try_from_context, Context};
pub use error::{ConfigError, DecodeError};
pub use registry::{ConfigDomain, Decoder, DomainValue, Registry, UpdateCallback, UpdateOutcome};
pub use store::Store;
