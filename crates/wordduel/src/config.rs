//! Server configuration.

/// Game socket address used when nothing else is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Health listener address used when nothing else is configured.
pub const DEFAULT_HEALTH_ADDR: &str = "127.0.0.1:8001";

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ENV: &str = "WORDDUEL_BIND";

/// Environment variable overriding [`ServerConfig::health_addr`].
/// The value `off` disables the health listener.
pub const HEALTH_BIND_ENV: &str = "WORDDUEL_HEALTH_BIND";

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// WebSocket listener for game traffic.
    pub bind_addr: String,
    /// HTTP listener for `GET /health`, or `None` to run without one.
    pub health_addr: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            health_addr: Some(DEFAULT_HEALTH_ADDR.to_string()),
        }
    }
}

impl ServerConfig {
    /// Reads overrides from `WORDDUEL_BIND` and `WORDDUEL_HEALTH_BIND`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr.trim().to_string();
        }
        if let Some(addr) = lookup(HEALTH_BIND_ENV).filter(|v| !v.trim().is_empty()) {
            let addr = addr.trim();
            config.health_addr = if addr.eq_ignore_ascii_case("off") {
                None
            } else {
                Some(addr.to_string())
            };
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.health_addr.as_deref(), Some("127.0.0.1:8001"));
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        assert_eq!(ServerConfig::from_lookup(lookup(&[])), ServerConfig::default());
        let blank = lookup(&[(BIND_ENV, "  "), (HEALTH_BIND_ENV, "")]);
        assert_eq!(ServerConfig::from_lookup(blank), ServerConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (BIND_ENV, "0.0.0.0:9000"),
            (HEALTH_BIND_ENV, " 0.0.0.0:9001 "),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.health_addr.as_deref(), Some("0.0.0.0:9001"));
    }

    #[test]
    fn test_health_off() {
        let config = ServerConfig::from_lookup(lookup(&[(HEALTH_BIND_ENV, "OFF")]));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.health_addr, None);
    }
}
