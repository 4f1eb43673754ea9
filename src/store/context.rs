//! Execution-scope binding for `Config`.
//!
//! # Responsibilities
//! - Attach a `Config` to a scope without mutating the parent scope
//! - Retrieve the bound `Config` from a scope or an HTTP request
//!
//! # Design Decisions
//! - The binding lives under a private key type, so no other value stored in
//!   the same scope can collide with it
//! - Scopes are values: attaching returns a new scope and clones inherit
//!   every binding of their parent
//! - Reading a scope that was never given a `Config` is a caller bug and
//!   panics; `try_*` variants exist for code that can recover

use axum::http::{Extensions, Request};

use crate::store::config::Config;

/// Private key for the bound `Config`.
#[derive(Clone)]
struct ConfigKey(Config);

/// A typed value bag scoped to one unit of work.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: Extensions,
}

impl Context {
    /// An empty root scope.
    pub fn background() -> Self {
        Self::default()
    }

    /// A child scope with `value` bound, replacing any value of the same type.
    pub fn with_value<T: Clone + Send + Sync + 'static>(&self, value: T) -> Self {
        let mut values = self.values.clone();
        values.insert(value);
        Self { values }
    }

    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values.get::<T>()
    }
}

/// Return a child of `ctx` with `config` bound.
pub fn to_context(ctx: &Context, config: Config) -> Context {
    ctx.with_value(ConfigKey(config))
}

/// The `Config` bound to `ctx`, if any.
pub fn try_from_context(ctx: &Context) -> Option<&Config> {
    ctx.value::<ConfigKey>().map(|key| &key.0)
}

/// The `Config` bound to `ctx`.
///
/// # Panics
/// If no `Config` was attached anywhere in the scope chain.
pub fn from_context(ctx: &Context) -> &Config {
    match try_from_context(ctx) {
        Some(config) => config,
        None => panic!("no Config attached to context; attach one with Store::to_context first"),
    }
}

/// Bind `config` to a request, replacing any earlier binding.
pub fn attach_to_request<B>(req: &mut Request<B>, config: Config) {
    req.extensions_mut().insert(ConfigKey(config));
}

pub fn try_from_request<B>(req: &Request<B>) -> Option<&Config> {
    try_from_extensions(req.extensions())
}

/// The `Config` bound to a request.
///
/// # Panics
/// If the request never passed through `attach_to_request`.
pub fn from_request<B>(req: &Request<B>) -> &Config {
    match try_from_request(req) {
        Some(config) => config,
        None => panic!("no Config attached to request; is the config middleware installed?"),
    }
}

pub(crate) fn try_from_extensions(extensions: &Extensions) -> Option<&Config> {
    extensions.get::<ConfigKey>().map(|key| &key.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{Gateway, IstioConfig};
    use std::sync::Arc;

    fn config_with_gateway(name: &str) -> Config {
        Config {
            istio: Arc::new(IstioConfig {
                ingress_gateways: vec![Gateway::new("ns", name, "svc.local")],
                local_gateways: Vec::new(),
            }),
            ..Config::default()
        }
    }

    #[test]
    fn test_round_trip() {
        let config = config_with_gateway("gw");
        let ctx = to_context(&Context::background(), config.clone());
        assert_eq!(from_context(&ctx), &config);
    }

    #[test]
    fn test_attach_does_not_mutate_parent() {
        let parent = Context::background();
        let child = to_context(&parent, config_with_gateway("gw"));

        assert!(try_from_context(&parent).is_none());
        assert!(try_from_context(&child).is_some());
    }

    #[test]
    fn test_child_inherits_and_overrides() {
        #[derive(Clone, Debug, PartialEq)]
        struct RequestTag(&'static str);

        let parent = to_context(&Context::background(), config_with_gateway("first"));
        let child = parent.with_value(RequestTag("child"));
        assert_eq!(from_context(&child).istio.ingress_gateways[0].name, "first");
        assert_eq!(child.value::<RequestTag>(), Some(&RequestTag("child")));

        let overridden = to_context(&child, config_with_gateway("second"));
        assert_eq!(from_context(&overridden).istio.ingress_gateways[0].name, "second");
        assert_eq!(from_context(&child).istio.ingress_gateways[0].name, "first");
    }

    #[test]
    #[should_panic(expected = "no Config attached to context")]
    fn test_missing_config_panics() {
        from_context(&Context::background());
    }

    #[test]
    fn test_request_binding() {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        assert!(try_from_request(&req).is_none());

        let config = config_with_gateway("gw");
        attach_to_request(&mut req, config.clone());
        assert_eq!(from_request(&req), &config);
    }
}
