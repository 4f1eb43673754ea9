//! The slice of an ingress resource the override resolver reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ingress gateway override, `namespace/name`.
pub const INGRESS_GATEWAY_ANNOTATION: &str = "networking.knative.dev/gateway.ingress";
/// Service URL for the ingress gateway override.
pub const INGRESS_GATEWAY_URL_ANNOTATION: &str = "networking.knative.dev/gateway.ingress.url";
/// Local gateway override, `namespace/name`.
pub const LOCAL_GATEWAY_ANNOTATION: &str = "networking.knative.dev/gateway.local";
/// Service URL for the local gateway override.
pub const LOCAL_GATEWAY_URL_ANNOTATION: &str = "networking.knative.dev/gateway.local.url";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// An ingress resource. Only metadata is modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingress {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl Ingress {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                annotations: BTreeMap::new(),
            },
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    /// Annotation value with surrounding whitespace removed.
    /// Missing and all-whitespace values are both `None`.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
