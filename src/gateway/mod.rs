//! Gateway server - publishes the catalog and the proxied endpoints over HTTP

pub mod image_generator;
pub mod registry;

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use warp::Filter;

use crate::config::GatewayConfig;

/// Shared state handed to every route
pub struct GatewayState {
    pub config: GatewayConfig,
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.upstream.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        GatewayState { config, client }
    }
}

fn with_state(
    state: Arc<GatewayState>,
) -> impl Filter<Extract = (Arc<GatewayState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// All gateway routes with CORS for any origin
pub fn routes(
    state: Arc<GatewayState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let settings = registry::build_settings(&state.config, registry::routes());
    let settings_route = warp::path("settings")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || warp::reply::json(&settings));

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    let image_route = warp::path!("ai" / "image-generator")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state))
        .and_then(image_generator::handle);

    settings_route
        .or(health_route)
        .or(image_route)
        .with(warp::cors().allow_any_origin())
}

/// Bind and serve until the process is stopped
pub async fn run_server(config: GatewayConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind))?;
    if config.api_keys.is_empty() {
        tracing::warn!("No API keys configured; every keyed request will be rejected");
    }

    let state = Arc::new(GatewayState::new(config));
    info!(%addr, routes = registry::routes().len(), "Gateway listening");
    warp::serve(routes(state)).run(addr).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{json, Value};
    use warp::http::StatusCode;

    use super::*;
    use crate::config::UpstreamConfig;

    fn state_for(upstream: UpstreamConfig) -> Arc<GatewayState> {
        let config = GatewayConfig {
            api_keys: vec![String::from("secret")],
            upstream,
            ..GatewayConfig::default()
        };
        Arc::new(GatewayState::new(config))
    }

    fn unreachable_upstream() -> UpstreamConfig {
        UpstreamConfig {
            page_url: String::from("http://127.0.0.1:9/page"),
            ajax_url: String::from("http://127.0.0.1:9/ajax"),
            origin: String::from("http://127.0.0.1:9"),
            user_agent: String::from("Mozilla/5.0"),
        }
    }

    /// Fake third-party site. Counts page hits and echoes the form back.
    async fn fake_upstream(page: &'static str, reply: Value, hits: Arc<AtomicUsize>) -> UpstreamConfig {
        let page_route = warp::path("page").and(warp::get()).map(move || {
            hits.fetch_add(1, Ordering::SeqCst);
            warp::reply::html(page)
        });
        let ajax_route = warp::path("ajax")
            .and(warp::post())
            .and(warp::header::<String>("x-requested-with"))
            .and(warp::body::form::<HashMap<String, String>>())
            .map(move |requested_with: String, form: HashMap<String, String>| {
                if reply.is_null() {
                    return warp::reply::json(&Value::Null);
                }
                warp::reply::json(&json!({
                    "success": reply["success"].clone(),
                    "requested_with": requested_with,
                    "form": form,
                }))
            });

        let (addr, server) = warp::serve(page_route.or(ajax_route)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        UpstreamConfig {
            page_url: format!("http://{}/page", addr),
            ajax_url: format!("http://{}/ajax", addr),
            origin: format!("http://{}", addr),
            user_agent: String::from("Mozilla/5.0"),
        }
    }

    async fn call(state: Arc<GatewayState>, path: &str) -> (StatusCode, Value) {
        let resp = warp::test::request().method("GET").path(path).reply(&routes(state)).await;
        let body = serde_json::from_slice(resp.body()).unwrap();
        (resp.status(), body)
    }

    const PAGE: &str = r#"<script>window.cfg={"ai_generate_image_nonce":"abc123"};</script>"#;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(state_for(unreachable_upstream()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_settings_lists_registry() {
        let (_, body) = call(state_for(unreachable_upstream()), "/settings").await;
        assert_eq!(body["name"], "API Dock");
        assert_eq!(body["categories"][0]["name"], "Openai");
        assert_eq!(body["categories"][0]["items"][0]["path"], "/ai/image-generator?apikey=&prompt=");
    }

    #[tokio::test]
    async fn test_invalid_key_never_reaches_upstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let upstream = fake_upstream(PAGE, json!({"success": true}), hits.clone()).await;
        let state = state_for(upstream);

        for path in ["/ai/image-generator?prompt=cat", "/ai/image-generator?apikey=wrong&prompt=cat"] {
            let (status, body) = call(state.clone(), path).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": false, "error": "Apikey invalid"}));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_prompt() {
        let (_, body) = call(state_for(unreachable_upstream()), "/ai/image-generator?apikey=secret&prompt=").await;
        assert_eq!(body, json!({"status": false, "error": "Prompt must not be empty"}));
    }

    #[tokio::test]
    async fn test_successful_generation_relays_upstream_json() {
        let hits = Arc::new(AtomicUsize::new(0));
        let upstream = fake_upstream(PAGE, json!({"success": true}), hits.clone()).await;
        let (status, body) =
            call(state_for(upstream), "/ai/image-generator?apikey=secret&prompt=a%20red%20fox").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], true);
        let result = &body["result"];
        assert_eq!(result["success"], true);
        assert_eq!(result["requested_with"], "XMLHttpRequest");
        let form = &result["form"];
        assert_eq!(form["action"], "ai_generate_image");
        assert_eq!(form["nonce"], "abc123");
        assert_eq!(form["prompt"], "a red fox");
        assert_eq!(form["aspect_ratio"], "1:1");
        assert_eq!(form["style_model"], "flataipro");
        assert!(form["seed"].as_str().unwrap().parse::<i64>().is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_nonce() {
        let hits = Arc::new(AtomicUsize::new(0));
        let upstream = fake_upstream("<html>maintenance</html>", json!({"success": true}), hits).await;
        let (_, body) = call(state_for(upstream), "/ai/image-generator?apikey=secret&prompt=cat").await;
        assert_eq!(body, json!({"status": false, "error": "Nonce not found"}));
    }

    #[tokio::test]
    async fn test_upstream_reports_failure() {
        for reply in [json!({"success": false}), Value::Null] {
            let hits = Arc::new(AtomicUsize::new(0));
            let upstream = fake_upstream(PAGE, reply, hits).await;
            let (_, body) = call(state_for(upstream), "/ai/image-generator?apikey=secret&prompt=cat").await;
            assert_eq!(body, json!({"status": false, "error": "Failed to generate image"}));
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_a_500() {
        let (status, body) =
            call(state_for(unreachable_upstream()), "/ai/image-generator?apikey=secret&prompt=cat").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}
