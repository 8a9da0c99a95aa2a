//! Repository configuration.
//!
//! Bundles the remote base URL with the route and envelope tables. The
//! default value is the reference catalog wiring; deployments override it by
//! loading JSON.

use serde::{Deserialize, Serialize};

use crate::registry::{EnvelopeTable, RouteTable};

/// Default base URL, matching the mock server's default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration passed to `HttpRepository::new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Base URL of the catalog API, without the route segment.
    pub base_url: String,
    pub routes: RouteTable,
    pub envelopes: EnvelopeTable,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            routes: RouteTable::default(),
            envelopes: EnvelopeTable::default(),
        }
    }
}

impl RepositoryConfig {
    /// Reference wiring against a different host.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Parse a configuration document. Omitted sections fall back to the
    /// reference wiring; an explicit table replaces it wholesale.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}
