//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use ingress_config::source::RawBlock;

/// `config-istio` block with the given ingress gateways
/// as `(namespace, name, service)`.
pub fn istio_block(ingress: &[(&str, &str, &str)]) -> RawBlock {
    ingress
        .iter()
        .map(|(ns, name, svc)| (format!("gateway.{ns}.{name}"), svc.to_string()))
        .collect()
}

/// Write a source file the way an operator would: whole file at once.
pub fn write_source(dir: &Path, domain: &str, content: &str) {
    std::fs::write(dir.join(format!("{domain}.toml")), content).unwrap();
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
