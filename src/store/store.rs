//! The ingress configuration store.

use std::sync::Arc;

use crate::domains::{IstioConfig, NetworkConfig};
use crate::source::RawBlock;
use crate::store::config::Config;
use crate::store::context::{self, Context};
use crate::store::error::ConfigError;
use crate::store::registry::{ConfigDomain, Registry, UpdateCallback, UpdateOutcome};

/// Label the store uses in logs.
pub const STORE_NAME: &str = "ingress";

/// Registry wired with the domains the ingress controller consumes.
///
/// Clones share the same registry.
#[derive(Debug, Clone)]
pub struct Store {
    registry: Arc<Registry>,
}

impl Store {
    /// Create a store with every domain seeded from its defaults.
    ///
    /// `callbacks` run after each successful update, seeding included.
    /// Fails if a domain cannot decode an empty block.
    pub fn new(callbacks: Vec<UpdateCallback>) -> Result<Self, ConfigError> {
        let registry = Registry::new(STORE_NAME, callbacks);
        let store = Self {
            registry: Arc::new(registry),
        };
        store.seed::<IstioConfig>()?;
        store.seed::<NetworkConfig>()?;
        Ok(store)
    }

    fn seed<D: ConfigDomain>(&self) -> Result<(), ConfigError> {
        self.registry.register_domain::<D>()?;
        let empty = RawBlock::default();
        if let UpdateOutcome::Applied { .. } = self.registry.on_source_update(D::NAME, &empty) {
            return Ok(());
        }
        // Decode again to surface the reason; the registry only logs it.
        match D::decode(&empty) {
            Ok(_) => Err(ConfigError::DomainNotRegistered(D::NAME.to_string())),
            Err(source) => Err(ConfigError::InitialDecode {
                domain: D::NAME.to_string(),
                source,
            }),
        }
    }

    /// Deliver a changed raw block for `domain`.
    pub fn on_source_update(&self, domain: &str, raw: &RawBlock) -> UpdateOutcome {
        self.registry.on_source_update(domain, raw)
    }

    /// Build a fresh `Config` from the current domain values.
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        Ok(Config {
            istio: self.registry.get_typed::<IstioConfig>()?,
            network: self.registry.get_typed::<NetworkConfig>()?,
        })
    }

    /// Build a fresh `Config` from the current domain values.
    ///
    /// # Panics
    /// Only if a domain lost its seed value, which `Store::new` rules out.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(e) => panic!("ingress config store is not seeded: {e}"),
        }
    }

    /// `load` and bind the result to a child of `ctx`.
    pub fn to_context(&self, ctx: &Context) -> Context {
        context::to_context(ctx, self.load())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
