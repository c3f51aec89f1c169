use std::env;

use shared::ServiceBases;
use tracing::info;

const DEFAULT_HOST_NAME: &str = "http://localhost:8000";
const DEFAULT_VOTER_API: &str = "http://localhost:8081";
const DEFAULT_POLL_API: &str = "http://localhost:8082";

/// Addresses the votes service uses to reach itself and its neighbours.
///
/// `internal` is used for validation and history propagation, `external` when
/// rendering links back to clients. The two may point at different networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub internal: ServiceBases,
    pub external: ServiceBases,
}

impl Config {
    pub fn load() -> Self {
        let host_name = try_load("HOST_NAME", DEFAULT_HOST_NAME);
        let voter_internal = try_load("VOTER_API_INTERNAL", DEFAULT_VOTER_API);
        let poll_internal = try_load("POLL_API_INTERNAL", DEFAULT_POLL_API);
        let voter_external = try_load("VOTER_API_EXTERNAL", &voter_internal);
        let poll_external = try_load("POLL_API_EXTERNAL", &poll_internal);

        Self {
            internal: ServiceBases::new(host_name.clone(), voter_internal, poll_internal),
            external: ServiceBases::new(host_name, voter_external, poll_external),
        }
    }
}

fn try_load(key: &str, default: &str) -> String {
    let value = env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        });
    info!("{key}: {value}");
    value
}
