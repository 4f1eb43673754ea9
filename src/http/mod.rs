//! HTTP surface of the controller.
//!
//! # Data Flow
//! ```text
//! Request
//!     → TraceLayer / TimeoutLayer
//!     → middleware.rs (Store::load → Config bound to the request)
//!     → server.rs handlers (read the bound Config, resolve overrides)
//!     → JSON response
//! ```

pub mod middleware;
pub mod server;

pub use middleware::BoundConfig;
pub use server::{build_router, AppState, HttpServer};
