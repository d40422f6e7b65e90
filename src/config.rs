use std::env;

/// Bounds on a single retrieval, threaded into the query validator and the
/// pagination walker at construction so tests can override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Upper bound on any caller-supplied record cap.
    pub max_results: usize,
    /// Server-side maximum page size; one page request never asks for more.
    pub page_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_results: 1000,
            page_size: 100,
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Base URL of the upstream incident API.
    pub api_base_url: String,
    /// Bearer token for the upstream API.
    pub api_token: String,
    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: u64,
    pub limits: Limits,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// `PAGERDUTY_TOKEN` is the only required variable; everything else has
    /// a default suitable for local development.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = env::var("PAGERDUTY_TOKEN")
            .map_err(|_| anyhow::anyhow!("PAGERDUTY_TOKEN must be set"))?;

        let defaults = Limits::default();
        let limits = Limits {
            max_results: env::var("MAX_RESULTS")
                .unwrap_or_else(|_| defaults.max_results.to_string())
                .parse()?,
            page_size: env::var("PAGE_SIZE")
                .unwrap_or_else(|_| defaults.page_size.to_string())
                .parse()?,
        };
        if limits.max_results == 0 || limits.page_size == 0 {
            anyhow::bail!("MAX_RESULTS and PAGE_SIZE must be positive");
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            api_base_url: env::var("PAGERDUTY_API_BASE")
                .unwrap_or_else(|_| "https://api.pagerduty.com".to_string()),
            api_token,
            request_timeout_secs: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            limits,
        })
    }
}
