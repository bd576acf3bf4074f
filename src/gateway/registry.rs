//! Route registry - metadata every proxied endpoint publishes into `/settings`

use crate::config::GatewayConfig;
use crate::models::{Category, Endpoint, Settings};

/// Catalog entry declared by a proxy route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    /// Path template, query keys declare the parameters
    pub path: &'static str,
    pub method: &'static str,
    pub status: &'static str,
}

impl RouteMeta {
    fn to_endpoint(self) -> Endpoint {
        Endpoint {
            name: Some(self.name.to_string()),
            desc: Some(self.desc.to_string()),
            method: Some(self.method.to_string()),
            path: Some(self.path.to_string()),
            status: Some(self.status.to_string()),
        }
    }
}

/// Every route served by the gateway
pub fn routes() -> &'static [RouteMeta] {
    &[super::image_generator::META]
}

/// Group routes into categories by name, in first-seen order
pub fn build_settings(config: &GatewayConfig, routes: &[RouteMeta]) -> Settings {
    let mut categories: Vec<Category> = Vec::new();
    for route in routes {
        match categories
            .iter_mut()
            .find(|c| c.name.as_deref() == Some(route.category))
        {
            Some(category) => category.items.push(route.to_endpoint()),
            None => categories.push(Category::new(route.category, vec![route.to_endpoint()])),
        }
    }

    Settings {
        name: config.name.clone(),
        creator: config.creator.clone(),
        description: config.description.clone(),
        link_whatsapp: config.link_whatsapp.clone(),
        link_youtube: config.link_youtube.clone(),
        categories,
        ..Settings::default()
    }
}
