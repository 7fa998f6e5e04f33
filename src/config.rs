//! Runtime configuration for the hub.

use std::path::PathBuf;
use std::time::Duration;

/// Default listener host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default listener port.
pub const DEFAULT_PORT: u16 = 8080;

/// Upstream exchange-rate endpoint. Queried with `?date=DD.MM.YYYY`.
pub const DEFAULT_RATES_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Hub configuration.
///
/// Every field has a fixed default; the `with_*` methods exist so tests can
/// bind an ephemeral port and point lookups at a mock upstream.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Host the listener binds to.
    pub host: String,

    /// Port the listener binds to. `0` picks an ephemeral port.
    pub port: u16,

    /// Base URL of the rate-lookup API.
    pub rates_url: String,

    /// Upper bound for a single upstream request.
    pub lookup_timeout: Duration,

    /// Upper bound for writing one message to one peer's socket.
    pub send_timeout: Duration,

    /// Messages buffered per peer before broadcasts start dropping.
    pub outbound_buffer: usize,

    /// Dropped messages after which a slow peer is evicted.
    pub max_peer_drops: u64,

    /// Append-only command audit log.
    pub audit_log_path: PathBuf,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rates_url: DEFAULT_RATES_URL.to_string(),
            lookup_timeout: Duration::from_secs(60),
            send_timeout: Duration::from_secs(5),
            outbound_buffer: 64,
            max_peer_drops: 100,
            audit_log_path: PathBuf::from("log.txt"),
        }
    }
}

impl HubConfig {
    pub fn with_addr(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_rates_url(mut self, url: impl Into<String>) -> Self {
        self.rates_url = url.into();
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_outbound_buffer(mut self, capacity: usize) -> Self {
        self.outbound_buffer = capacity;
        self
    }

    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log_path = path.into();
        self
    }

    /// `host:port` string handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.bind_addr(), "localhost:8080");
        assert_eq!(config.lookup_timeout, Duration::from_secs(60));
        assert_eq!(config.audit_log_path, PathBuf::from("log.txt"));
    }

    #[test]
    fn test_builders_override() {
        let config = HubConfig::default()
            .with_addr("127.0.0.1", 0)
            .with_rates_url("http://mock/rates")
            .with_lookup_timeout(Duration::from_millis(250))
            .with_send_timeout(Duration::from_millis(100))
            .with_outbound_buffer(1024);
        assert_eq!(config.bind_addr(), "127.0.0.1:0");
        assert_eq!(config.send_timeout, Duration::from_millis(100));
        assert_eq!(config.outbound_buffer, 1024);
        assert_eq!(config.rates_url, "http://mock/rates");
        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
    }
}
