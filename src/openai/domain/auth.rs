//! API key resolution.

/// Placeholder key used for local endpoints that ignore authentication.
pub const NOT_NEEDED: &str = "not-needed";

/// Environment variable consulted when nothing more specific is configured.
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Ordered sources for an API key.
///
/// Resolution tries the explicit key, then the configured variable, then
/// [`FALLBACK_API_KEY_ENV`], then [`NOT_NEEDED`] for loopback endpoints.
/// Blank values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyStrategy {
    explicit: Option<String>,
    env_var: Option<String>,
    base_url: Option<String>,
}

impl ApiKeyStrategy {
    /// Creates a strategy consulting only the fallback variable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the literal key.
    #[must_use]
    pub fn with_explicit(mut self, key: Option<&str>) -> Self {
        self.explicit = key.map(str::to_owned);
        self
    }

    /// Sets the variable to read before the fallback.
    #[must_use]
    pub fn with_env_var(mut self, name: Option<&str>) -> Self {
        self.env_var = name.map(str::to_owned);
        self
    }

    /// Sets the endpoint, used to detect loopback services.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        self.base_url = base_url.map(str::to_owned);
        self
    }

    /// Resolves the key, reading variables through `env`.
    pub fn resolve(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let present = |value: String| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };
        self.explicit
            .clone()
            .and_then(present)
            .or_else(|| self.env_var.as_deref().and_then(&env).and_then(present))
            .or_else(|| env(FALLBACK_API_KEY_ENV).and_then(present))
            .or_else(|| {
                self.base_url
                    .as_deref()
                    .filter(|url| is_loopback(url))
                    .map(|_| NOT_NEEDED.to_owned())
            })
    }
}

fn is_loopback(url: &str) -> bool {
    url.starts_with("http://localhost") || url.starts_with("http://127.0.0.1")
}
