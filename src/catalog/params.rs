//! Parameter extraction from endpoint path templates
//!
//! The query string of a template such as `/tool/x?apikey=&query=` is the
//! authoritative declaration of an endpoint's parameters.

use url::form_urlencoded;

/// A named input derived from a template's query string
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub required: bool,
    pub param_type: &'static str,
    pub description: &'static str,
    /// Literal value present in the template (often empty)
    pub default_value: String,
}

/// Split a template into its base and (possibly absent) query string at the first `?`
pub fn split_template(template: &str) -> (&str, Option<&str>) {
    match template.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (template, None),
    }
}

/// Parse a query string into unique keys in declaration order.
///
/// A repeated key keeps the position of its first occurrence and the value
/// of its last one.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match pairs.iter_mut().find(|pair| pair.0 == key) {
            Some(existing) => existing.1 = value.into_owned(),
            None => pairs.push((key.into_owned(), value.into_owned())),
        }
    }
    pairs
}

/// Extract the parameters declared by a path template
pub fn extract_parameters(template: &str) -> Vec<Parameter> {
    let query = match split_template(template) {
        (_, Some(query)) if !query.is_empty() => query,
        _ => return Vec::new(),
    };

    parse_query(query)
        .into_iter()
        .map(|(name, default_value)| Parameter {
            param_type: param_type(&name),
            description: param_description(&name),
            required: false,
            name,
            default_value,
        })
        .collect()
}

/// Static name -> type lookup (case-sensitive)
pub fn param_type(name: &str) -> &'static str {
    match name {
        "apikey" | "url" | "question" | "query" | "prompt" | "format" | "quality" | "size" => {
            "string"
        }
        "limit" => "number",
        _ => "string",
    }
}

/// Static name -> description lookup (case-sensitive)
pub fn param_description(name: &str) -> &'static str {
    match name {
        "apikey" => "Your API key for authentication",
        "url" => "URL of the content to download/process",
        "question" => "Question or message to ask the AI",
        "query" => "Search query or keywords",
        "prompt" => "Text description for image generation",
        "format" => "Output format (mp4, mp3, jpg, png)",
        "quality" => "Video quality (360p, 720p, 1080p)",
        "size" => "Image dimensions (512x512, 1024x1024)",
        "limit" => "Number of results to return",
        _ => "Optional parameter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_and_defaults() {
        let params = extract_parameters("/x?a=&b=x");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(params[0].default_value, "");
        assert_eq!(params[1].default_value, "x");
    }

    #[test]
    fn test_no_query_means_no_parameters() {
        assert!(extract_parameters("/random/quote").is_empty());
        assert!(extract_parameters("/random/quote?").is_empty());
        assert!(extract_parameters("").is_empty());
    }

    #[test]
    fn test_lookup_tables() {
        let params = extract_parameters("/search?query=&limit=10&Query=");
        assert_eq!(params[0].param_type, "string");
        assert_eq!(params[0].description, "Search query or keywords");
        assert_eq!(params[1].param_type, "number");
        assert_eq!(params[1].default_value, "10");
        // lookups are case-sensitive
        assert_eq!(params[2].description, "Optional parameter");
        assert!(params.iter().all(|p| !p.required));
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let params = extract_parameters("/x?a=1&b=&a=2");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "a");
        assert_eq!(params[0].default_value, "2");
    }

    #[test]
    fn test_only_first_question_mark_splits() {
        let (base, query) = split_template("/x?q=what?");
        assert_eq!(base, "/x");
        assert_eq!(query, Some("q=what?"));
        assert_eq!(extract_parameters("/x?q=what?")[0].default_value, "what?");
    }
}
