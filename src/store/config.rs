//! The composite configuration snapshot handed to request code.

use std::sync::Arc;

use serde::Serialize;

use crate::domains::{IstioConfig, NetworkConfig};

/// One immutable value per configuration domain.
///
/// Every `Store::load` builds a new `Config`. The domain values are shared
/// `Arc`s that the registry never mutates, so a `Config` held for the length
/// of a request cannot change underfoot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub istio: Arc<IstioConfig>,
    pub network: Arc<NetworkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            istio: Arc::new(IstioConfig::default()),
            network: Arc::new(NetworkConfig::default()),
        }
    }
}
