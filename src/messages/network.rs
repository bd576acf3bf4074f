//! Network messages - communication between App and Network layers

use crate::catalog::EndpointKey;
use crate::models::{HttpMethod, Settings};
use crate::network::content::{ExecuteError, ResponseContent};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the catalog settings from the gateway
    LoadSettings {
        url: String,
    },
    /// Execute one endpoint's synchronized URL (no body)
    ExecuteRequest {
        id: u64,
        key: EndpointKey,
        method: HttpMethod,
        url: String,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Settings are ready. `fallback` is set when the defaults were substituted.
    SettingsLoaded {
        settings: Settings,
        fallback: bool,
    },
    /// Successful HTTP response
    Success {
        id: u64,
        key: EndpointKey,
        status: u16,
        status_text: String,
        content: ResponseContent,
        time_ms: u64,
    },
    /// Transport failure, non-2xx status or embedded JSON error
    Error {
        id: u64,
        key: EndpointKey,
        error: ExecuteError,
    },
}
