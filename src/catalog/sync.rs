//! URL synchronization - maps current form values to the exact request URL

use url::form_urlencoded;

use crate::catalog::params::{parse_query, split_template};

/// Resolve a template against the gateway origin. Absolute templates are kept as-is.
pub fn resolve(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), path)
    }
}

/// URL shown before any synchronization: every declared value is blanked
pub fn initial_url(origin: &str, template: &str) -> String {
    let (base, query) = split_template(template);
    let base = resolve(origin, base);
    match query {
        Some(query) if !query.is_empty() => {
            let blanked = parse_query(query)
                .into_iter()
                .map(|(key, _)| (key, String::new()));
            join(&base, blanked)
        }
        _ => base,
    }
}

fn join<I>(base: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut pairs = pairs.into_iter().peekable();
    if pairs.peek().is_none() {
        return base.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}?{}", base, query)
}

/// Frozen base and default query of one rendered endpoint.
///
/// Captured on first synchronization and never changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct UrlSynchronizer {
    base: String,
    default_query: Vec<(String, String)>,
}

impl UrlSynchronizer {
    /// Freeze the base (everything before `?`) and default query of a displayed URL
    pub fn freeze(displayed_url: &str) -> Self {
        let (base, query) = split_template(displayed_url.trim());
        UrlSynchronizer {
            base: base.to_string(),
            default_query: query.map(parse_query).unwrap_or_default(),
        }
    }

    /// Rebuild the URL from the frozen defaults overwritten by the given inputs.
    ///
    /// Values are trimmed; empty values still serialize as `key=`. Names that the
    /// frozen query does not declare are ignored.
    pub fn synchronize<'a, I>(&self, inputs: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pairs = self.default_query.clone();
        for (name, value) in inputs {
            if let Some(pair) = pairs.iter_mut().find(|pair| pair.0 == name) {
                pair.1 = value.trim().to_string();
            }
        }
        join(&self.base, pairs)
    }
}
