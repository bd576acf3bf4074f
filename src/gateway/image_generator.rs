//! Image generator - scrapes a one-time nonce from the upstream page and replays it
//! in the form POST that actually generates the image.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};
use warp::http::StatusCode;

use super::registry::RouteMeta;
use super::GatewayState;

pub const META: RouteMeta = RouteMeta {
    name: "Image Generator",
    desc: "Generate AI Image from prompt",
    category: "Openai",
    path: "/ai/image-generator?apikey=&prompt=",
    method: "GET",
    status: "ready",
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Apikey invalid")]
    InvalidApiKey,
    #[error("Prompt must not be empty")]
    EmptyPrompt,
    #[error("Nonce not found")]
    NonceNotFound,
    #[error("Failed to generate image")]
    GenerationFailed,
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl GatewayError {
    /// Validation and generation failures are regular replies; only upstream faults are 500s
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }
}

fn nonce_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"(?i)ai_generate_image_nonce":"([a-f0-9]+)""#).ok())
        .as_ref()
}

/// Pull the image nonce out of the upstream page
pub fn extract_nonce(html: &str) -> Option<&str> {
    nonce_pattern()?
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Upstream reports failure with a falsy body or `success: false`
fn is_failure(result: &Value) -> bool {
    match result {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => result.get("success") == Some(&Value::Bool(false)),
    }
}

pub async fn generate(state: &GatewayState, query: &HashMap<String, String>) -> Result<Value, GatewayError> {
    let apikey = query.get("apikey").map(String::as_str).unwrap_or("");
    if apikey.is_empty() || !state.config.api_keys.iter().any(|k| k == apikey) {
        return Err(GatewayError::InvalidApiKey);
    }

    let prompt = query.get("prompt").map(String::as_str).unwrap_or("");
    if prompt.is_empty() {
        return Err(GatewayError::EmptyPrompt);
    }

    let upstream = &state.config.upstream;
    let html = state
        .client
        .get(&upstream.page_url)
        .header("User-Agent", &upstream.user_agent)
        .header("Accept", "text/html")
        .send()
        .await?
        .text()
        .await?;

    let nonce = extract_nonce(&html).ok_or(GatewayError::NonceNotFound)?;
    let seed = chrono::Utc::now().timestamp_millis().to_string();

    let form = [
        ("action", "ai_generate_image"),
        ("nonce", nonce),
        ("prompt", prompt),
        ("aspect_ratio", "1:1"),
        ("seed", seed.as_str()),
        ("style_model", "flataipro"),
    ];
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();

    let result: Value = state
        .client
        .post(&upstream.ajax_url)
        .header("User-Agent", &upstream.user_agent)
        .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
        .header("X-Requested-With", "XMLHttpRequest")
        .header("Origin", &upstream.origin)
        .header("Referer", &upstream.page_url)
        .body(body)
        .send()
        .await?
        .json()
        .await?;

    if is_failure(&result) {
        return Err(GatewayError::GenerationFailed);
    }
    Ok(result)
}

pub async fn handle(
    query: HashMap<String, String>,
    state: Arc<GatewayState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    use warp::Reply;

    match generate(&state, &query).await {
        Ok(result) => {
            info!("Image generated");
            Ok(warp::reply::json(&json!({ "status": true, "result": result })).into_response())
        }
        Err(e) => {
            warn!(error = %e, "Image generation rejected");
            let body = warp::reply::json(&json!({ "status": false, "error": e.to_string() }));
            Ok(warp::reply::with_status(body, e.status()).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nonce() {
        let html = r#"<script>var cfg = {"AI_GENERATE_IMAGE_NONCE":"9f3a0c"};</script>"#;
        assert_eq!(extract_nonce(html), Some("9f3a0c"));
        assert_eq!(extract_nonce(r#"{"ai_generate_image_nonce":"XYZ"}"#), None);
        assert_eq!(extract_nonce("<html></html>"), None);
    }

    #[test]
    fn test_upstream_failure_detection() {
        assert!(is_failure(&Value::Null));
        assert!(is_failure(&json!({"success": false})));
        assert!(!is_failure(&json!({"success": true, "data": {}})));
        assert!(!is_failure(&json!({"images": []})));
    }

    #[test]
    fn test_falsy_upstream_bodies_are_failures() {
        assert!(is_failure(&json!(false)));
        assert!(is_failure(&json!(0)));
        assert!(is_failure(&json!("")));
        assert!(!is_failure(&json!(true)));
        assert!(!is_failure(&json!("https://img.example/1.png")));
        assert!(!is_failure(&json!([])));
    }

    #[test]
    fn test_handler_future_is_send() {
        use crate::config::GatewayConfig;

        fn assert_send<T: Send>(_: &T) {}
        let state = Arc::new(GatewayState::new(GatewayConfig::default()));
        let fut = handle(HashMap::new(), state);
        assert_send(&fut);
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(GatewayError::InvalidApiKey.status(), StatusCode::OK);
        assert_eq!(GatewayError::NonceNotFound.to_string(), "Nonce not found");
    }
}
