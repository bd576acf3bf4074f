//! Lenient settings parsing
//!
//! The catalog is walked value-by-value so that one malformed entry never
//! takes the rest of the catalog down with it.

use serde_json::Value;

use crate::models::{Category, Endpoint, Settings};

/// Parse a settings payload. Returns `None` when the payload is not an object.
pub fn parse_settings(value: &Value) -> Option<Settings> {
    let obj = value.as_object()?;
    let defaults = Settings::default();

    let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(String::from);

    let categories = obj
        .get("categories")
        .and_then(|c| c.as_array())
        .map(|list| list.iter().filter_map(parse_category).collect())
        .unwrap_or_default();

    Some(Settings {
        name: text("name").unwrap_or(defaults.name),
        creator: text("creator").unwrap_or(defaults.creator),
        description: text("description").unwrap_or(defaults.description),
        theme: text("theme").unwrap_or(defaults.theme),
        link_whatsapp: text("linkWhatsapp"),
        link_youtube: text("linkYoutube"),
        categories,
    })
}

fn parse_category(value: &Value) -> Option<Category> {
    let obj = value.as_object()?;
    let items = obj
        .get("items")
        .and_then(|i| i.as_array())
        .map(|list| list.iter().filter_map(parse_endpoint).collect())
        .unwrap_or_default();

    Some(Category {
        name: string_field(value, "name"),
        items,
    })
}

fn parse_endpoint(value: &Value) -> Option<Endpoint> {
    value.as_object()?;
    Some(Endpoint {
        name: string_field(value, "name"),
        desc: string_field(value, "desc"),
        method: string_field(value, "method"),
        path: string_field(value, "path"),
        status: string_field(value, "status"),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(String::from)
}
