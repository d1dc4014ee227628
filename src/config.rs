//! Build-time client configuration.
//!
//! The WASM bundle has no process environment at runtime, so values are baked
//! in with `option_env!` when the crate is compiled:
//!
//! - `RECRUIT_API_BASE_URL`: REST backend root (default `http://127.0.0.1:8000/api`)
//! - `RECRUIT_AUTH_URL`: auth provider root
//! - `RECRUIT_AUTH_KEY`: public (anon) key sent as `apikey` to the auth provider

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Auth provider location and public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub url: String,
    pub api_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// `None` when either the provider URL or key is missing.
    pub auth_provider: Option<ProviderEndpoint>,
}

impl ClientConfig {
    /// Build config from the values captured at compile time.
    pub fn from_build_env() -> Self {
        let config = Self::from_values(
            option_env!("RECRUIT_API_BASE_URL"),
            option_env!("RECRUIT_AUTH_URL"),
            option_env!("RECRUIT_AUTH_KEY"),
        );
        if config.auth_provider.is_none() {
            leptos::logging::error!("auth provider not configured: set RECRUIT_AUTH_URL and RECRUIT_AUTH_KEY");
        }
        config
    }

    /// Build config from raw optional values. Blank values count as missing.
    pub fn from_values(api_base_url: Option<&str>, auth_url: Option<&str>, auth_key: Option<&str>) -> Self {
        let api_base_url = non_blank(api_base_url).map_or_else(|| DEFAULT_API_BASE_URL.to_owned(), normalize_url);
        let auth_provider = match (non_blank(auth_url), non_blank(auth_key)) {
            (Some(url), Some(key)) => Some(ProviderEndpoint { url: normalize_url(url), api_key: key.to_owned() }),
            _ => None,
        };
        Self { api_base_url, auth_provider }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_values(None, None, None)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_owned()
}
