//! Istio gateway domain (`config-istio`).
//!
//! # Raw Format
//! ```text
//! gateway.<namespace>.<name>        = <service hostname>   (ingress-facing)
//! local-gateway.<namespace>.<name>  = <service hostname>   (cluster-local)
//! ```
//! A suffix without a namespace (`gateway.<name>`) lives in the system
//! namespace. Keys outside the two prefixes are ignored.

use serde::{Deserialize, Serialize};

use crate::domains::SYSTEM_NAMESPACE;
use crate::source::RawBlock;
use crate::store::{ConfigDomain, DecodeError};

const INGRESS_GATEWAY_PREFIX: &str = "gateway.";
const LOCAL_GATEWAY_PREFIX: &str = "local-gateway.";

const DEFAULT_INGRESS_GATEWAY_NAME: &str = "knative-ingress-gateway";
const DEFAULT_INGRESS_GATEWAY_SERVICE: &str = "istio-ingressgateway.istio-system.svc.cluster.local";
const DEFAULT_LOCAL_GATEWAY_NAME: &str = "knative-local-gateway";
const DEFAULT_LOCAL_GATEWAY_SERVICE: &str = "knative-local-gateway.istio-system.svc.cluster.local";

/// A routing target for ingress or local traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub name: String,
    pub namespace: String,
    pub service_url: String,
}

impl Gateway {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        service_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            service_url: service_url.into(),
        }
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Gateways the ingress reconciler programs, per traffic visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IstioConfig {
    /// Gateways for traffic from outside the cluster.
    pub ingress_gateways: Vec<Gateway>,
    /// Gateways for cluster-local traffic.
    pub local_gateways: Vec<Gateway>,
}

impl Default for IstioConfig {
    fn default() -> Self {
        Self {
            ingress_gateways: vec![Gateway::new(
                SYSTEM_NAMESPACE,
                DEFAULT_INGRESS_GATEWAY_NAME,
                DEFAULT_INGRESS_GATEWAY_SERVICE,
            )],
            local_gateways: vec![Gateway::new(
                SYSTEM_NAMESPACE,
                DEFAULT_LOCAL_GATEWAY_NAME,
                DEFAULT_LOCAL_GATEWAY_SERVICE,
            )],
        }
    }
}

impl ConfigDomain for IstioConfig {
    const NAME: &'static str = "config-istio";

    fn decode(raw: &RawBlock) -> Result<Self, DecodeError> {
        let defaults = IstioConfig::default();

        let mut ingress_gateways = parse_gateways(raw, INGRESS_GATEWAY_PREFIX)?;
        if ingress_gateways.is_empty() {
            ingress_gateways = defaults.ingress_gateways;
        }
        let mut local_gateways = parse_gateways(raw, LOCAL_GATEWAY_PREFIX)?;
        if local_gateways.is_empty() {
            local_gateways = defaults.local_gateways;
        }

        Ok(IstioConfig {
            ingress_gateways,
            local_gateways,
        })
    }
}

/// Collect gateways under `prefix`, in key order.
fn parse_gateways(raw: &RawBlock, prefix: &str) -> Result<Vec<Gateway>, DecodeError> {
    let mut gateways = Vec::new();
    // RawBlock iterates in key order, which keeps the output stable.
    for (key, service_url) in raw.iter() {
        let Some(gateway_name) = key.strip_prefix(prefix) else {
            continue;
        };
        if gateway_name.is_empty() {
            continue;
        }

        let host = service_url.trim();
        if !is_dns1123_subdomain(host.strip_suffix('.').unwrap_or(host)) {
            return Err(DecodeError::invalid(
                key,
                format!("gateway service {host:?} is not a valid DNS-1123 subdomain"),
            ));
        }

        let (namespace, name) = match gateway_name.split_once('.') {
            Some((namespace, name)) => (namespace, name),
            None => (SYSTEM_NAMESPACE, gateway_name),
        };
        if namespace.is_empty() || name.is_empty() {
            return Err(DecodeError::invalid(key, "gateway namespace and name must be non-empty"));
        }
        gateways.push(Gateway::new(namespace, name, host));
    }
    Ok(gateways)
}

fn is_dns1123_subdomain(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        let bytes = label.as_bytes();
        !bytes.is_empty()
            && bytes.len() <= 63
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
            && bytes[0] != b'-'
            && bytes[bytes.len() - 1] != b'-'
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_yields_defaults() {
        let cfg = IstioConfig::decode(&RawBlock::default()).unwrap();
        assert_eq!(cfg, IstioConfig::default());
        assert_eq!(
            cfg.ingress_gateways[0].qualified_name(),
            "knative-serving/knative-ingress-gateway"
        );
        assert_eq!(
            cfg.local_gateways[0].service_url,
            "knative-local-gateway.istio-system.svc.cluster.local"
        );
    }

    #[test]
    fn test_gateways_parsed_and_sorted() {
        let raw = RawBlock::from_iter([
            ("gateway.ns-b.gw", "b.istio-system.svc.cluster.local"),
            ("gateway.ns-a.gw", "a.istio-system.svc.cluster.local."),
            ("local-gateway.ns-c.local", "c.istio-system.svc.cluster.local"),
            ("unrelated", "value"),
        ]);
        let cfg = IstioConfig::decode(&raw).unwrap();

        assert_eq!(
            cfg.ingress_gateways,
            vec![
                Gateway::new("ns-a", "gw", "a.istio-system.svc.cluster.local."),
                Gateway::new("ns-b", "gw", "b.istio-system.svc.cluster.local"),
            ]
        );
        assert_eq!(
            cfg.local_gateways,
            vec![Gateway::new("ns-c", "local", "c.istio-system.svc.cluster.local")]
        );
    }

    #[test]
    fn test_gateway_without_namespace_uses_system_namespace() {
        let raw = RawBlock::from_iter([("gateway.public", "public.example.com")]);
        let cfg = IstioConfig::decode(&raw).unwrap();
        assert_eq!(cfg.ingress_gateways[0].namespace, SYSTEM_NAMESPACE);
        assert_eq!(cfg.ingress_gateways[0].name, "public");
        // Local gateways fall back independently
        assert_eq!(cfg.local_gateways, IstioConfig::default().local_gateways);
    }

    #[test]
    fn test_invalid_service_rejected() {
        let raw = RawBlock::from_iter([("gateway.ns.gw", "Not_A_Host")]);
        let err = IstioConfig::decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { key, .. } if key == "gateway.ns.gw"));
    }

    #[test]
    fn test_dns1123() {
        assert!(is_dns1123_subdomain("a.b-c.d1"));
        assert!(!is_dns1123_subdomain("-a.b"));
        assert!(!is_dns1123_subdomain("a..b"));
        assert!(!is_dns1123_subdomain("UPPER.case"));
        assert!(!is_dns1123_subdomain(""));
    }
}
