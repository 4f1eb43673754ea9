//! Controller settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML) or defaults
//!     → loader.rs (deserialize, apply CLI overrides)
//!     → validation.rs (semantic checks, once)
//!     → ControllerSettings (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Read once at startup; only the configuration domains hot-reload
//! - All fields have defaults to allow minimal files

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_settings, SettingsError, SettingsOverrides};
pub use schema::{ControllerSettings, ListenerSettings, ObservabilitySettings, SourceSettings};
