//! HTTP client wrapper - loads the catalog and executes endpoint calls

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::catalog::{parse_settings, EndpointKey};
use crate::config::ConsoleConfig;
use crate::messages::NetworkResponse;
use crate::models::{HttpMethod, Settings};
use crate::network::content::{
    decode_text_body, media_extension, ContentKind, ExecuteError, MediaBlob, ResponseContent,
};

/// Create an HTTP client from the console configuration. No timeout unless configured.
pub fn create_client(config: &ConsoleConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Fetch the catalog. Any failure yields the default settings with `fallback` set.
pub async fn fetch_settings(client: &reqwest::Client, url: &str) -> (Settings, bool) {
    match try_fetch_settings(client, url).await {
        Ok(settings) => (settings, false),
        Err(e) => {
            warn!(%url, error = %e, "Falling back to default settings");
            (Settings::default(), true)
        }
    }
}

async fn try_fetch_settings(client: &reqwest::Client, url: &str) -> anyhow::Result<Settings> {
    let resp = client.get(url).send().await?.error_for_status()?;
    let value: serde_json::Value = resp.json().await?;
    parse_settings(&value).ok_or_else(|| anyhow::anyhow!("settings payload is not an object"))
}

fn transport_error(e: &reqwest::Error) -> ExecuteError {
    let msg = if e.is_timeout() {
        String::from("Request timed out")
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    ExecuteError::Transport(msg)
}

/// Execute one endpoint call and classify its response
pub async fn execute_request(
    client: &reqwest::Client,
    id: u64,
    key: EndpointKey,
    method: HttpMethod,
    url: String,
    media_dir: &Path,
) -> NetworkResponse {
    let start = Instant::now();
    match perform(client, id, &method, &url, media_dir).await {
        Ok((status, status_text, content)) => NetworkResponse::Success {
            id,
            key,
            status,
            status_text,
            content,
            time_ms: start.elapsed().as_millis() as u64,
        },
        Err(error) => NetworkResponse::Error { id, key, error },
    }
}

async fn perform(
    client: &reqwest::Client,
    id: u64,
    method: &HttpMethod,
    url: &str,
    media_dir: &Path,
) -> Result<(u16, String, ResponseContent), ExecuteError> {
    let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| ExecuteError::Transport(format!("Invalid method: {}", e)))?;

    let resp = client
        .request(method, url)
        .header(ACCEPT, "*/*")
        .send()
        .await
        .map_err(|e| transport_error(&e))?;

    let status = resp.status();
    let status_text = status.canonical_reason().unwrap_or("").to_string();
    if !status.is_success() {
        return Err(ExecuteError::Http { status: status.as_u16(), status_text });
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let kind = ContentKind::classify(&content_type);
    debug!(id, kind = kind.as_str(), %content_type, "Response received");

    let body = resp.bytes().await.map_err(|e| transport_error(&e))?;

    let content = match kind {
        ContentKind::Image | ContentKind::Audio | ContentKind::Video => {
            let blob = MediaBlob {
                mime: content_type.clone(),
                size: body.len(),
                path: store_media(media_dir, id, &content_type, &body).await,
            };
            match kind {
                ContentKind::Image => ResponseContent::Image(blob),
                ContentKind::Audio => ResponseContent::Audio(blob),
                _ => ResponseContent::Video(blob),
            }
        }
        _ => decode_text_body(kind, &body)?,
    };

    Ok((status.as_u16(), status_text, content))
}

/// Write a media body to disk so it can be opened outside the terminal
async fn store_media(dir: &Path, id: u64, mime: &str, body: &[u8]) -> Option<PathBuf> {
    let path = dir.join(format!("response-{}.{}", id, media_extension(mime)));
    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, body).await
    };
    match written.await {
        Ok(()) => Some(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to store media body");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use tempfile::tempdir;
    use warp::http::StatusCode;
    use warp::Filter;

    use super::*;

    async fn upstream() -> SocketAddr {
        let settings = warp::path("settings").map(|| {
            warp::reply::json(&serde_json::json!({
                "name": "Dock",
                "categories": [{"name": "Tools", "items": [{"name": "Ping", "path": "/ping"}]}]
            }))
        });
        let json = warp::path("json").map(|| warp::reply::json(&serde_json::json!({"ok": 1})));
        let api_error = warp::path("api-error")
            .map(|| warp::reply::json(&serde_json::json!({"error": "Apikey invalid"})));
        let missing = warp::path("missing")
            .map(|| warp::reply::with_status("nope", StatusCode::NOT_FOUND));
        let text = warp::path("text").map(|| "plain body");
        let image = warp::path("image").map(|| {
            warp::http::Response::builder()
                .header("content-type", "image/png")
                .body(vec![0x89u8, b'P', b'N', b'G'])
                .unwrap()
        });
        let echo_method = warp::path("method")
            .and(warp::method())
            .map(|m: warp::http::Method| m.to_string());

        let routes = settings
            .or(json)
            .or(api_error)
            .or(missing)
            .or(text)
            .or(image)
            .or(echo_method);
        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    fn client() -> reqwest::Client {
        create_client(&ConsoleConfig::default())
    }

    async fn run(addr: SocketAddr, path: &str, dir: &Path) -> NetworkResponse {
        let url = format!("http://{}{}", addr, path);
        execute_request(&client(), 7, EndpointKey::new(0, 0), HttpMethod::GET, url, dir).await
    }

    #[tokio::test]
    async fn test_fetch_settings() {
        let addr = upstream().await;
        let (settings, fallback) = fetch_settings(&client(), &format!("http://{}/settings", addr)).await;
        assert!(!fallback);
        assert_eq!(settings.name, "Dock");
        assert_eq!(settings.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_settings_falls_back() {
        let addr = upstream().await;
        let (settings, fallback) = fetch_settings(&client(), &format!("http://{}/missing", addr)).await;
        assert!(fallback);
        assert!(settings.categories.is_empty());
    }

    #[tokio::test]
    async fn test_json_success() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        match run(addr, "/json", dir.path()).await {
            NetworkResponse::Success { status, status_text, content, .. } => {
                assert_eq!(status, 200);
                assert_eq!(status_text, "OK");
                assert_eq!(content, ResponseContent::Json("{\n  \"ok\": 1\n}".into()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embedded_error() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        match run(addr, "/api-error", dir.path()).await {
            NetworkResponse::Error { error, .. } => {
                assert_eq!(error, ExecuteError::Api("Apikey invalid".into()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_skips_body() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        match run(addr, "/missing", dir.path()).await {
            NetworkResponse::Error { error, .. } => {
                assert_eq!(error.to_string(), "HTTP 404: Not Found")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_text_body() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        match run(addr, "/text", dir.path()).await {
            NetworkResponse::Success { content, .. } => {
                assert_eq!(content, ResponseContent::Text("plain body".into()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_is_written_to_media_dir() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        match run(addr, "/image", dir.path()).await {
            NetworkResponse::Success { content: ResponseContent::Image(blob), .. } => {
                assert_eq!(blob.size, 4);
                let path = blob.path.unwrap();
                assert_eq!(path, dir.path().join("response-7.png"));
                assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_declared_method_is_used() {
        let addr = upstream().await;
        let dir = tempdir().unwrap();
        let url = format!("http://{}/method", addr);
        let resp =
            execute_request(&client(), 1, EndpointKey::new(0, 0), HttpMethod::POST, url, dir.path()).await;
        match resp {
            NetworkResponse::Success { content, .. } => {
                assert_eq!(content, ResponseContent::Text("POST".into()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let dir = tempdir().unwrap();
        let resp = execute_request(
            &client(),
            1,
            EndpointKey::new(0, 0),
            HttpMethod::GET,
            String::from("http://127.0.0.1:9/"),
            dir.path(),
        )
        .await;
        assert!(matches!(
            resp,
            NetworkResponse::Error { error: ExecuteError::Transport(_), .. }
        ));
    }
}
