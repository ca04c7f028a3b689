use core_config::{ConfigError, FromEnv, env_or_default};

pub const DEFAULT_MASTER_URL: &str = "http://127.0.0.1:8817";
pub const DEFAULT_ROUTER_URL: &str = "http://127.0.0.1:9001";
pub const DEFAULT_DB_NAME: &str = "test_db";

/// Vearch connection configuration.
///
/// `master_url` serves the control plane (databases and spaces), `router_url`
/// serves documents and search. Set once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VearchConfig {
    pub master_url: String,
    pub router_url: String,
    pub db_name: String,
}

impl VearchConfig {
    pub fn new(master_url: String, router_url: String, db_name: String) -> Self {
        Self {
            master_url: trim_base(master_url),
            router_url: trim_base(router_url),
            db_name,
        }
    }

    pub fn with_db_name(mut self, db_name: String) -> Self {
        self.db_name = db_name;
        self
    }

    /// Control-plane URL built from path segments.
    pub fn master(&self, segments: &[&str]) -> String {
        join_url(&self.master_url, segments)
    }

    /// Data-plane URL for a space in the configured database.
    pub fn router(&self, space: &str, segments: &[&str]) -> String {
        let mut all = Vec::with_capacity(segments.len() + 2);
        all.push(self.db_name.as_str());
        all.push(space);
        all.extend_from_slice(segments);
        join_url(&self.router_url, &all)
    }
}

impl FromEnv for VearchConfig {
    /// Reads:
    /// - VEARCH_MASTER_URL: defaults to http://127.0.0.1:8817
    /// - VEARCH_ROUTER_URL: defaults to http://127.0.0.1:9001
    /// - VEARCH_DB_NAME: defaults to test_db
    fn from_env() -> Result<Self, ConfigError> {
        let db_name = env_or_default("VEARCH_DB_NAME", DEFAULT_DB_NAME);
        if db_name.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "VEARCH_DB_NAME".to_string(),
                details: "database name cannot be empty".to_string(),
            });
        }

        Ok(Self::new(
            env_or_default("VEARCH_MASTER_URL", DEFAULT_MASTER_URL),
            env_or_default("VEARCH_ROUTER_URL", DEFAULT_ROUTER_URL),
            db_name,
        ))
    }
}

impl Default for VearchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MASTER_URL.to_string(),
            DEFAULT_ROUTER_URL.to_string(),
            DEFAULT_DB_NAME.to_string(),
        )
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}
