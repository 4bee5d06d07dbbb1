use std::time::Duration;

pub const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:8000/all-trials";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub ledger_url: String,
    pub poll_interval_ms: u64,
    /// `None` leaves the HTTP client's own defaults in place.
    pub request_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ledger_url: DEFAULT_LEDGER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: None,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("MEDGUARD_LEDGER_URL") {
            if !url.trim().is_empty() {
                cfg.ledger_url = url.trim().to_string();
            }
        }
        cfg.poll_interval_ms = read_env_u64("MEDGUARD_POLL_INTERVAL_MS", cfg.poll_interval_ms);
        cfg.request_timeout_ms = read_env_opt_u64("MEDGUARD_REQUEST_TIMEOUT_MS");
        cfg
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|v| *v > 0)
            .map(Duration::from_millis)
    }
}

fn read_env_u64(name: &str, default: u64) -> u64 {
    read_env_opt_u64(name).unwrap_or(default)
}

fn read_env_opt_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_constants() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.ledger_url, "http://127.0.0.1:8000/all-trials");
        assert_eq!(cfg.poll_interval(), Duration::from_millis(5_000));
        assert_eq!(cfg.request_timeout(), None);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = SyncConfig {
            poll_interval_ms: 0,
            request_timeout_ms: Some(0),
            ..SyncConfig::default()
        };
        assert_eq!(cfg.poll_interval(), Duration::from_millis(1));
        assert_eq!(cfg.request_timeout(), None);
    }
}
