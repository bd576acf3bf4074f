//! Response classification - one variant per content family
//!
//! The declared `Content-Type` alone decides how a body is interpreted.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Failure of a single endpoint execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecuteError {
    /// Non-2xx status
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    /// The call never produced a usable response
    #[error("{0}")]
    Transport(String),
    /// HTTP succeeded but the JSON payload reports an `error`
    #[error("{0}")]
    Api(String),
}

/// Content family of a response, decided by its declared content type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Audio,
    Video,
    Json,
    Text,
    Binary,
}

impl ContentKind {
    pub fn classify(content_type: &str) -> ContentKind {
        let ct = content_type.trim().to_ascii_lowercase();
        if ct.starts_with("image/") {
            ContentKind::Image
        } else if ct.contains("audio/") {
            ContentKind::Audio
        } else if ct.contains("video/") {
            ContentKind::Video
        } else if ct.contains("application/json") {
            ContentKind::Json
        } else if ct.contains("text/") {
            ContentKind::Text
        } else {
            ContentKind::Binary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Image => "image",
            ContentKind::Audio => "audio",
            ContentKind::Video => "video",
            ContentKind::Json => "json",
            ContentKind::Text => "text",
            ContentKind::Binary => "binary",
        }
    }
}

/// A media body kept outside the UI, referenced by file path
#[derive(Clone, Debug, PartialEq)]
pub struct MediaBlob {
    pub mime: String,
    pub size: usize,
    pub path: Option<PathBuf>,
}

/// Rendered body of a successful response
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseContent {
    Image(MediaBlob),
    Audio(MediaBlob),
    Video(MediaBlob),
    /// Pretty-printed with 2-space indentation
    Json(String),
    Text(String),
    /// Unknown content type rendered as opaque text
    Binary(String),
}

impl ResponseContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            ResponseContent::Image(_) => ContentKind::Image,
            ResponseContent::Audio(_) => ContentKind::Audio,
            ResponseContent::Video(_) => ContentKind::Video,
            ResponseContent::Json(_) => ContentKind::Json,
            ResponseContent::Text(_) => ContentKind::Text,
            ResponseContent::Binary(_) => ContentKind::Binary,
        }
    }

    /// Plain text form, used for copying
    pub fn to_text(&self) -> String {
        match self {
            ResponseContent::Image(blob)
            | ResponseContent::Audio(blob)
            | ResponseContent::Video(blob) => match &blob.path {
                Some(path) => path.display().to_string(),
                None => format!("[{} body, {} bytes]", blob.mime, blob.size),
            },
            ResponseContent::Json(text)
            | ResponseContent::Text(text)
            | ResponseContent::Binary(text) => text.clone(),
        }
    }
}

/// Interpret a non-media body. Media kinds are handled by the caller since they
/// need to be written out first.
pub fn decode_text_body(kind: ContentKind, body: &[u8]) -> Result<ResponseContent, ExecuteError> {
    match kind {
        ContentKind::Json => {
            let data: Value = serde_json::from_slice(body)
                .map_err(|e| ExecuteError::Transport(format!("Invalid JSON response: {}", e)))?;
            if let Some(message) = embedded_error(&data) {
                return Err(ExecuteError::Api(message));
            }
            let pretty = serde_json::to_string_pretty(&data)
                .map_err(|e| ExecuteError::Transport(e.to_string()))?;
            Ok(ResponseContent::Json(sanitize(&pretty)))
        }
        ContentKind::Text => Ok(ResponseContent::Text(sanitize(&String::from_utf8_lossy(body)))),
        _ => Ok(ResponseContent::Binary(sanitize(&String::from_utf8_lossy(body)))),
    }
}

/// Message of a truthy `error` field on a JSON object
pub fn embedded_error(data: &Value) -> Option<String> {
    let error = data.as_object()?.get("error")?;
    let truthy = match error {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    if !truthy {
        return None;
    }
    Some(match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// File extension for a media MIME type (`image/svg+xml` -> `svg`)
pub fn media_extension(mime: &str) -> String {
    let subtype = mime
        .split(';')
        .next()
        .and_then(|essence| essence.split('/').nth(1))
        .unwrap_or("bin");
    let subtype = subtype.split('+').next().unwrap_or(subtype).trim();
    if subtype.is_empty() {
        String::from("bin")
    } else {
        subtype.to_ascii_lowercase()
    }
}

/// Strip control characters so response text cannot drive the terminal
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
