//! Config API served over the router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use ingress_config::domains::{IstioConfig, NetworkConfig};
use ingress_config::http::build_router;
use ingress_config::settings::ListenerSettings;
use ingress_config::source::RawBlock;
use ingress_config::store::{ConfigDomain, Store};

mod common;

async fn send(store: &Store, request: Request<Body>) -> (StatusCode, Value) {
    let router = build_router(store.clone(), &ListenerSettings::default());
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let store = Store::new(Vec::new()).unwrap();
    let (status, body) = send(&store, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn test_config_reflects_latest_update() {
    let store = Store::new(Vec::new()).unwrap();
    store.on_source_update(
        NetworkConfig::NAME,
        &RawBlock::from_iter([("auto-tls", "Enabled")]),
    );

    let (status, body) = send(&store, get("/config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["network"]["auto_tls"], json!(true));
    assert_eq!(
        body["istio"]["ingress_gateways"][0]["name"],
        json!("knative-ingress-gateway")
    );
}

#[tokio::test]
async fn test_revisions() {
    let store = Store::new(Vec::new()).unwrap();
    store.on_source_update(
        IstioConfig::NAME,
        &common::istio_block(&[("ns", "gw", "gw.ns.svc")]),
    );

    let (status, body) = send(&store, get("/config/revisions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "config-istio": 2, "config-network": 1 }));
}

#[tokio::test]
async fn test_resolve_with_override() {
    let store = Store::new(Vec::new()).unwrap();
    let ingress = json!({
        "metadata": {
            "name": "hello",
            "namespace": "default",
            "annotations": {
                "networking.knative.dev/gateway.ingress": "ns1/gw1",
                "networking.knative.dev/gateway.ingress.url": "http://x"
            }
        }
    });

    let (status, body) = send(&store, post("/config/gateways/resolve", ingress.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["ingress_gateways"],
        json!([{ "name": "gw1", "namespace": "ns1", "service_url": "http://x" }])
    );
    assert_eq!(
        body["local_gateways"][0]["name"],
        json!("knative-local-gateway")
    );
}

#[tokio::test]
async fn test_resolve_without_ingress() {
    let store = Store::new(Vec::new()).unwrap();
    let (status, body) = send(&store, post("/config/gateways/resolve", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(IstioConfig::default()).unwrap());
}

#[tokio::test]
async fn test_resolve_malformed_override() {
    let store = Store::new(Vec::new()).unwrap();
    let ingress = json!({
        "metadata": {
            "name": "hello",
            "annotations": { "networking.knative.dev/gateway.local": "a/b/c" }
        }
    });

    let (status, body) = send(&store, post("/config/gateways/resolve", ingress.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("a/b/c"));

    // The store is untouched
    assert_eq!(*store.load().istio, IstioConfig::default());
}

#[tokio::test]
async fn test_resolve_invalid_json() {
    let store = Store::new(Vec::new()).unwrap();
    let (status, body) = send(&store, post("/config/gateways/resolve", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid ingress"));
}
