//! Snapshot registry: the latest decoded object per configuration domain.
//!
//! # Responsibilities
//! - Map domain names to decoders
//! - Decode raw blocks and swap the stored value atomically
//! - Notify post-update callbacks after each successful swap
//! - Hand out typed values and point-in-time snapshots
//!
//! # Design Decisions
//! - Values are immutable `Arc`s; a swap replaces the pointer, never the contents
//! - Readers are lock-free (`ArcSwapOption`); writers for one domain are
//!   serialized by a per-domain mutex held across decode + swap
//! - A failed decode keeps the previous value (stale beats empty)
//! - Callbacks and the revision gauge run under the per-domain lock, so
//!   notifications for one domain arrive in revision order

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use dashmap::DashMap;

use crate::observability::metrics;
use crate::source::RawBlock;
use crate::store::error::{ConfigError, DecodeError};

/// A decoded domain object, type-erased.
pub type DomainValue = Arc<dyn Any + Send + Sync>;

/// Decodes one domain's raw block.
pub type Decoder = Box<dyn Fn(&RawBlock) -> Result<DomainValue, DecodeError> + Send + Sync>;

/// Invoked with `(domain, new_value)` after every successful update.
pub type UpdateCallback = Arc<dyn Fn(&str, &DomainValue) + Send + Sync>;

/// A typed configuration domain.
///
/// `NAME` is the registry key, so reading a domain through its type can never
/// hand back another domain's object.
pub trait ConfigDomain: Clone + Send + Sync + 'static {
    /// Name of the raw source this domain is decoded from.
    const NAME: &'static str;

    /// Decode a raw block. An empty block must yield the domain defaults
    /// or an error explaining what is required.
    fn decode(raw: &RawBlock) -> Result<Self, DecodeError>;
}

/// Result of delivering one raw block to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Decoded and stored under the given revision.
    Applied { revision: u64 },
    /// Decode failed; the previous value is still in place.
    Rejected,
    /// No decoder is registered for the domain.
    Ignored,
}

struct Revisioned {
    value: DomainValue,
    revision: u64,
}

struct Slot {
    decoder: Decoder,
    current: ArcSwapOption<Revisioned>,
    write: Mutex<()>,
}

/// Thread-safe registry of decoded configuration domains.
pub struct Registry {
    /// Label used in log lines, e.g. "ingress".
    name: String,
    slots: DashMap<String, Arc<Slot>>,
    callbacks: Vec<UpdateCallback>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("domains", &self.domains())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new(name: impl Into<String>, callbacks: Vec<UpdateCallback>) -> Self {
        Self {
            name: name.into(),
            slots: DashMap::new(),
            callbacks,
        }
    }

    /// Associate a decoder with a domain name.
    pub fn register(&self, domain: impl Into<String>, decoder: Decoder) -> Result<(), ConfigError> {
        use dashmap::mapref::entry::Entry;

        let domain = domain.into();
        match self.slots.entry(domain) {
            Entry::Occupied(e) => Err(ConfigError::DuplicateDomain(e.key().clone())),
            Entry::Vacant(e) => {
                tracing::debug!(store = %self.name, domain = %e.key(), "Registered config domain");
                e.insert(Arc::new(Slot {
                    decoder,
                    current: ArcSwapOption::empty(),
                    write: Mutex::new(()),
                }));
                Ok(())
            }
        }
    }

    /// Register a typed domain under `D::NAME`.
    pub fn register_domain<D: ConfigDomain>(&self) -> Result<(), ConfigError> {
        self.register(
            D::NAME,
            Box::new(|raw: &RawBlock| D::decode(raw).map(|d| Arc::new(d) as DomainValue)),
        )
    }

    /// Decode `raw` for `domain` and swap it in.
    ///
    /// Never fails: unknown domains and bad blocks are logged and reported
    /// through the returned outcome, and readers keep the old value.
    ///
    /// Callbacks run while the domain's write lock is held, so they see that
    /// domain's values in revision order. A callback must not update the
    /// domain it is notified about.
    pub fn on_source_update(&self, domain: &str, raw: &RawBlock) -> UpdateOutcome {
        // Clone the slot out so the map shard is not held while decoding.
        let Some(slot) = self.slots.get(domain).map(|s| s.value().clone()) else {
            tracing::warn!(store = %self.name, domain = %domain, "Ignoring update for unregistered config domain");
            metrics::record_update(domain, UpdateOutcome::Ignored);
            return UpdateOutcome::Ignored;
        };

        let _guard = slot.write.lock().unwrap_or_else(|e| e.into_inner());

        let value = match (slot.decoder)(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(
                    store = %self.name,
                    domain = %domain,
                    error = %e,
                    "Failed to decode config update. Keeping current value."
                );
                metrics::record_update(domain, UpdateOutcome::Rejected);
                return UpdateOutcome::Rejected;
            }
        };

        let revision = slot
            .current
            .load_full()
            .map(|r| r.revision + 1)
            .unwrap_or(1);
        slot.current.store(Some(Arc::new(Revisioned {
            value: value.clone(),
            revision,
        })));

        let outcome = UpdateOutcome::Applied { revision };
        tracing::info!(store = %self.name, domain = %domain, revision, "Config domain updated");
        metrics::record_update(domain, outcome);
        for callback in &self.callbacks {
            callback(domain, &value);
        }
        outcome
    }

    /// Current value of a domain.
    pub fn get(&self, domain: &str) -> Result<DomainValue, ConfigError> {
        self.slots
            .get(domain)
            .and_then(|slot| slot.current.load_full())
            .map(|r| r.value.clone())
            .ok_or_else(|| ConfigError::DomainNotRegistered(domain.to_string()))
    }

    /// Current value of a typed domain.
    pub fn get_typed<D: ConfigDomain>(&self) -> Result<Arc<D>, ConfigError> {
        self.get(D::NAME)?
            .downcast::<D>()
            .map_err(|_| ConfigError::TypeMismatch {
                domain: D::NAME.to_string(),
                expected: type_name::<D>(),
            })
    }

    /// Revision of the stored value, `None` until the first successful decode.
    pub fn revision(&self, domain: &str) -> Option<u64> {
        self.slots
            .get(domain)
            .and_then(|slot| slot.current.load_full().map(|r| r.revision))
    }

    /// Every decoded domain with its current value.
    ///
    /// Each domain is read independently: the result is consistent per
    /// domain, not across domains.
    pub fn snapshot(&self) -> HashMap<String, DomainValue> {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.current
                    .load_full()
                    .map(|r| (slot.key().clone(), r.value.clone()))
            })
            .collect()
    }

    /// Registered domain names, sorted.
    pub fn domains(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.iter().map(|s| s.key().clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        value: u32,
    }

    impl ConfigDomain for Counter {
        const NAME: &'static str = "counter";

        fn decode(raw: &RawBlock) -> Result<Self, DecodeError> {
            let value = match raw.get("value") {
                Some(v) => v
                    .parse()
                    .map_err(|_| DecodeError::invalid("value", "not a number"))?,
                None => 0,
            };
            Ok(Counter { value })
        }
    }

    fn block(value: &str) -> RawBlock {
        RawBlock::from_iter([("value", value)])
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = Registry::new("test", Vec::new());
        registry.register_domain::<Counter>().unwrap();

        let err = registry.register_domain::<Counter>().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDomain(name) if name == "counter"));
    }

    #[test]
    fn test_get_before_first_decode_fails() {
        let registry = Registry::new("test", Vec::new());
        assert!(matches!(
            registry.get("counter"),
            Err(ConfigError::DomainNotRegistered(_))
        ));

        registry.register_domain::<Counter>().unwrap();
        // Registered but never decoded
        assert!(matches!(
            registry.get_typed::<Counter>(),
            Err(ConfigError::DomainNotRegistered(_))
        ));
        assert_eq!(registry.revision("counter"), None);
    }

    #[test]
    fn test_unknown_domain_ignored() {
        let registry = Registry::new("test", Vec::new());
        assert_eq!(
            registry.on_source_update("nope", &block("1")),
            UpdateOutcome::Ignored
        );
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_revisions_increase_on_success_only() {
        let registry = Registry::new("test", Vec::new());
        registry.register_domain::<Counter>().unwrap();

        assert_eq!(
            registry.on_source_update("counter", &block("1")),
            UpdateOutcome::Applied { revision: 1 }
        );
        assert_eq!(
            registry.on_source_update("counter", &block("bad")),
            UpdateOutcome::Rejected
        );
        assert_eq!(
            registry.on_source_update("counter", &block("2")),
            UpdateOutcome::Applied { revision: 2 }
        );
        assert_eq!(registry.get_typed::<Counter>().unwrap().value, 2);
    }

    #[test]
    fn test_callbacks_fire_after_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let callback: UpdateCallback = Arc::new(move |domain, value| {
            assert_eq!(domain, "counter");
            assert!(value.downcast_ref::<Counter>().is_some());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let registry = Registry::new("test", vec![callback]);
        registry.register_domain::<Counter>().unwrap();

        registry.on_source_update("counter", &block("1"));
        registry.on_source_update("counter", &block("x"));
        registry.on_source_update("other", &block("1"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_type_mismatch_detected() {
        let registry = Registry::new("test", Vec::new());
        registry
            .register(
                "counter",
                Box::new(|_: &RawBlock| Ok(Arc::new("not a counter".to_string()) as DomainValue)),
            )
            .unwrap();
        registry.on_source_update("counter", &RawBlock::default());

        assert!(matches!(
            registry.get_typed::<Counter>(),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }
}
