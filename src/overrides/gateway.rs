//! Per-ingress gateway overrides.
//!
//! # Responsibilities
//! - Read the gateway override annotations of an ingress
//! - Replace the matching gateway list of a copy of the base config
//!
//! # Design Decisions
//! - The base config is cloned before any change; the cached value is never touched
//! - An override replaces the whole list with one gateway, it never appends
//! - A malformed `namespace/name` is an error for the caller, not a fallback

use thiserror::Error;

use crate::domains::{Gateway, IstioConfig};
use crate::overrides::ingress::{
    Ingress, INGRESS_GATEWAY_ANNOTATION, INGRESS_GATEWAY_URL_ANNOTATION, LOCAL_GATEWAY_ANNOTATION,
    LOCAL_GATEWAY_URL_ANNOTATION,
};
use crate::store::context::{from_context, Context};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("annotation {annotation} has malformed gateway {value:?}, expected \"namespace/name\"")]
    MalformedGatewayOverride {
        annotation: &'static str,
        value: String,
    },
}

/// Gateway config for `ingress`, with its annotation overrides applied over
/// the config bound to `ctx`.
///
/// # Panics
/// If `ctx` carries no `Config`.
pub fn resolve_gateway_config(
    ctx: &Context,
    ingress: Option<&Ingress>,
) -> Result<IstioConfig, OverrideError> {
    apply_gateway_overrides(&from_context(ctx).istio, ingress)
}

/// Copy `base` and apply the overrides found on `ingress`.
pub fn apply_gateway_overrides(
    base: &IstioConfig,
    ingress: Option<&Ingress>,
) -> Result<IstioConfig, OverrideError> {
    let mut resolved = base.clone();
    let Some(ing) = ingress else {
        return Ok(resolved);
    };

    if let Some(gateway) = gateway_override(ing, INGRESS_GATEWAY_ANNOTATION, INGRESS_GATEWAY_URL_ANNOTATION)? {
        tracing::debug!(
            ingress = %ing.metadata.name,
            gateway = %gateway.qualified_name(),
            "Overriding ingress gateways"
        );
        resolved.ingress_gateways = vec![gateway];
    }
    if let Some(gateway) = gateway_override(ing, LOCAL_GATEWAY_ANNOTATION, LOCAL_GATEWAY_URL_ANNOTATION)? {
        tracing::debug!(
            ingress = %ing.metadata.name,
            gateway = %gateway.qualified_name(),
            "Overriding local gateways"
        );
        resolved.local_gateways = vec![gateway];
    }
    Ok(resolved)
}

fn gateway_override(
    ing: &Ingress,
    annotation: &'static str,
    url_annotation: &str,
) -> Result<Option<Gateway>, OverrideError> {
    let Some(value) = ing.annotation(annotation) else {
        return Ok(None);
    };

    let mut segments = value.split('/');
    let (namespace, name) = match (segments.next(), segments.next(), segments.next()) {
        (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
            (namespace, name)
        }
        _ => {
            return Err(OverrideError::MalformedGatewayOverride {
                annotation,
                value: value.to_string(),
            })
        }
    };

    let service_url = ing.annotation(url_annotation).unwrap_or_default();
    Ok(Some(Gateway::new(namespace, name, service_url)))
}
