//! Generic network behavior domain (`config-network`).

use serde::{Deserialize, Serialize};

use crate::source::RawBlock;
use crate::store::{ConfigDomain, DecodeError};

const INGRESS_CLASS_KEY: &str = "ingress-class";
const LEGACY_INGRESS_CLASS_KEY: &str = "ingress.class";
const CERTIFICATE_CLASS_KEY: &str = "certificate-class";
const DOMAIN_TEMPLATE_KEY: &str = "domain-template";
const TAG_TEMPLATE_KEY: &str = "tag-template";
const AUTO_TLS_KEY: &str = "auto-tls";
const HTTP_PROTOCOL_KEY: &str = "http-protocol";
const DEFAULT_EXTERNAL_SCHEME_KEY: &str = "default-external-scheme";
const MESH_POD_ADDRESSABILITY_KEY: &str = "enable-mesh-pod-addressability";
const AUTOCREATE_DOMAIN_CLAIMS_KEY: &str = "autocreate-cluster-domain-claims";
const ROLLOUT_DURATION_KEY: &str = "rollout-duration";

pub const DEFAULT_INGRESS_CLASS: &str = "istio.ingress.networking.knative.dev";
pub const DEFAULT_CERTIFICATE_CLASS: &str = "cert-manager.certificate.networking.knative.dev";
pub const DEFAULT_DOMAIN_TEMPLATE: &str = "{{.Name}}.{{.Namespace}}.{{.Domain}}";
pub const DEFAULT_TAG_TEMPLATE: &str = "{{.Tag}}-{{.Name}}";

/// How plain HTTP requests are treated on external routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpProtocol {
    /// Serve HTTP traffic.
    #[default]
    Enabled,
    /// Answer HTTP with a redirect to HTTPS.
    Redirected,
    /// Reject HTTP traffic.
    Disabled,
}

/// Network settings shared by every ingress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ingress_class: String,
    pub certificate_class: String,
    pub domain_template: String,
    pub tag_template: String,
    pub auto_tls: bool,
    pub http_protocol: HttpProtocol,
    pub default_external_scheme: String,
    pub enable_mesh_pod_addressability: bool,
    pub autocreate_cluster_domain_claims: bool,
    /// Seconds over which traffic shifts to a new revision.
    pub rollout_duration_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ingress_class: DEFAULT_INGRESS_CLASS.to_string(),
            certificate_class: DEFAULT_CERTIFICATE_CLASS.to_string(),
            domain_template: DEFAULT_DOMAIN_TEMPLATE.to_string(),
            tag_template: DEFAULT_TAG_TEMPLATE.to_string(),
            auto_tls: false,
            http_protocol: HttpProtocol::Enabled,
            default_external_scheme: "http".to_string(),
            enable_mesh_pod_addressability: false,
            autocreate_cluster_domain_claims: false,
            rollout_duration_secs: 0,
        }
    }
}

impl ConfigDomain for NetworkConfig {
    const NAME: &'static str = "config-network";

    fn decode(raw: &RawBlock) -> Result<Self, DecodeError> {
        let mut cfg = NetworkConfig::default();

        // The legacy key only applies when the current one is absent.
        if let Some(class) = non_empty(raw, INGRESS_CLASS_KEY).or_else(|| non_empty(raw, LEGACY_INGRESS_CLASS_KEY)) {
            cfg.ingress_class = class.to_string();
        }
        if let Some(class) = non_empty(raw, CERTIFICATE_CLASS_KEY) {
            cfg.certificate_class = class.to_string();
        }
        if let Some(template) = non_empty(raw, DOMAIN_TEMPLATE_KEY) {
            require_placeholders(DOMAIN_TEMPLATE_KEY, template, &["{{.Name}}", "{{.Namespace}}"])?;
            cfg.domain_template = template.to_string();
        }
        if let Some(template) = non_empty(raw, TAG_TEMPLATE_KEY) {
            require_placeholders(TAG_TEMPLATE_KEY, template, &["{{.Tag}}", "{{.Name}}"])?;
            cfg.tag_template = template.to_string();
        }
        if let Some(value) = non_empty(raw, AUTO_TLS_KEY) {
            cfg.auto_tls = value.eq_ignore_ascii_case("enabled");
        }
        if let Some(value) = non_empty(raw, HTTP_PROTOCOL_KEY) {
            cfg.http_protocol = match value.to_ascii_lowercase().as_str() {
                "enabled" => HttpProtocol::Enabled,
                "redirected" => HttpProtocol::Redirected,
                "disabled" => HttpProtocol::Disabled,
                _ => {
                    return Err(DecodeError::invalid(
                        HTTP_PROTOCOL_KEY,
                        format!("{value:?} is not one of Enabled, Redirected, Disabled"),
                    ))
                }
            };
        }
        if let Some(scheme) = non_empty(raw, DEFAULT_EXTERNAL_SCHEME_KEY) {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(DecodeError::invalid(
                    DEFAULT_EXTERNAL_SCHEME_KEY,
                    format!("{scheme:?} must be http or https"),
                ));
            }
            cfg.default_external_scheme = scheme;
        }
        if let Some(value) = non_empty(raw, MESH_POD_ADDRESSABILITY_KEY) {
            cfg.enable_mesh_pod_addressability = parse_bool(MESH_POD_ADDRESSABILITY_KEY, value)?;
        }
        if let Some(value) = non_empty(raw, AUTOCREATE_DOMAIN_CLAIMS_KEY) {
            cfg.autocreate_cluster_domain_claims = parse_bool(AUTOCREATE_DOMAIN_CLAIMS_KEY, value)?;
        }
        if let Some(value) = non_empty(raw, ROLLOUT_DURATION_KEY) {
            cfg.rollout_duration_secs = value.parse().map_err(|_| {
                DecodeError::invalid(
                    ROLLOUT_DURATION_KEY,
                    format!("{value:?} is not a non-negative number of seconds"),
                )
            })?;
        }

        Ok(cfg)
    }
}

fn non_empty<'a>(raw: &'a RawBlock, key: &str) -> Option<&'a str> {
    raw.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DecodeError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DecodeError::invalid(key, format!("{value:?} is not a boolean"))),
    }
}

fn require_placeholders(key: &str, template: &str, required: &[&str]) -> Result<(), DecodeError> {
    match required.iter().find(|p| !template.contains(**p)) {
        Some(missing) => Err(DecodeError::invalid(
            key,
            format!("template {template:?} must contain {missing}"),
        )),
        None => Ok(()),
    }
}
