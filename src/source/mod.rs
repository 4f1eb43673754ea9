//! Configuration sources.
//!
//! # Data Flow
//! ```text
//! <config-dir>/<domain>.toml
//!     → loader.rs (flat TOML table → RawBlock)
//!     → watcher.rs (notify events → SourceEvent channel)
//!     → pump.rs (SourceEvent → Store::on_source_update)
//! ```
//!
//! # Design Decisions
//! - The file name is the domain name; unknown domains reach the store and
//!   are ignored there
//! - Unreadable files never produce an event; the store keeps the last value
//! - Deleting a file does not reset its domain

pub mod block;
pub mod loader;
pub mod pump;
pub mod watcher;

pub use block::RawBlock;
pub use loader::SourceError;
pub use watcher::SourceWatcher;

/// A changed raw block for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    pub domain: String,
    pub block: RawBlock,
}
