//! Configuration domains consumed by the ingress controller.
//!
//! Each domain is decoded independently from its own raw block and
//! registered with the store under its `ConfigDomain::NAME`.

pub mod istio;
pub mod network;

pub use istio::{Gateway, IstioConfig};
pub use network::{HttpProtocol, NetworkConfig};

/// Namespace the controller's own gateways live in.
pub const SYSTEM_NAMESPACE: &str = "knative-serving";
