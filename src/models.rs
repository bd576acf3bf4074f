use serde::{Deserialize, Serialize};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
    /// Anything else the catalog declares, kept upper-cased
    Other(String),
}

impl HttpMethod {
    /// Parse a catalog method string; absent or blank means GET
    pub fn parse(raw: Option<&str>) -> HttpMethod {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_uppercase(),
            _ => return HttpMethod::GET,
        };
        match raw.as_str() {
            "GET" => HttpMethod::GET,
            "POST" => HttpMethod::POST,
            "PUT" => HttpMethod::PUT,
            "PATCH" => HttpMethod::PATCH,
            "DELETE" => HttpMethod::DELETE,
            "HEAD" => HttpMethod::HEAD,
            "OPTIONS" => HttpMethod::OPTIONS,
            _ => HttpMethod::Other(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::Other(s) => s,
        }
    }
}

/// One documented, invocable operation. Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Endpoint {
            name: Some(name.into()),
            path: Some(path.into()),
            ..Endpoint::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// A named group of endpoints. Identity is positional; names may collide.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<Endpoint>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Endpoint>) -> Self {
        Category {
            name: Some(name.into()),
            items,
        }
    }
}

/// Settings object served by the gateway at `/settings`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub name: String,
    pub creator: String,
    pub description: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_youtube: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Default for Settings {
    fn default() -> Self {
        use crate::constants::APP_NAME;
        Settings {
            name: String::from(APP_NAME),
            creator: String::from("apidock"),
            description: String::from("Interactive API documentation with real-time testing"),
            theme: String::from("dark"),
            link_whatsapp: None,
            link_youtube: None,
            categories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_get() {
        assert_eq!(HttpMethod::parse(None), HttpMethod::GET);
        assert_eq!(HttpMethod::parse(Some("  ")), HttpMethod::GET);
        assert_eq!(HttpMethod::parse(Some("post")), HttpMethod::POST);
        assert_eq!(HttpMethod::parse(Some("purge")).as_str(), "PURGE");
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let settings = Settings {
            link_whatsapp: Some("https://wa.me/1".into()),
            ..Settings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["linkWhatsapp"], "https://wa.me/1");
        assert!(json.get("linkYoutube").is_none());
        assert_eq!(json["categories"], serde_json::json!([]));
    }
}
