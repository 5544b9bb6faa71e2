//! Built-in endpoint profiles for OpenAI-compatible services.

use std::collections::BTreeMap;

/// Connection defaults for one well-known service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    name: &'static str,
    provider: &'static str,
    base_url: Option<&'static str>,
    api_key_env: Option<&'static str>,
    headers: &'static [(&'static str, &'static str)],
}

const PROFILES: &[ProviderProfile] = &[
    ProviderProfile {
        name: "gemini",
        provider: "openai",
        base_url: Some("https://generativelanguage.googleapis.com/v1beta/openai/"),
        api_key_env: Some("GEMINI_API_KEY"),
        headers: &[],
    },
    ProviderProfile {
        name: "local",
        provider: "openai",
        base_url: Some("http://localhost:11434/v1"),
        api_key_env: None,
        headers: &[],
    },
    ProviderProfile {
        name: "openai",
        provider: "openai",
        base_url: None,
        api_key_env: Some("OPENAI_API_KEY"),
        headers: &[],
    },
    ProviderProfile {
        name: "openrouter",
        provider: "openai",
        base_url: Some("https://openrouter.ai/api/v1"),
        api_key_env: Some("OPENROUTER_API_KEY"),
        headers: &[
            ("HTTP-Referer", "https://github.com/maestro-agents/maestro"),
            ("X-Title", "maestro"),
        ],
    },
    ProviderProfile {
        name: "sdk",
        provider: "sdk",
        base_url: None,
        api_key_env: None,
        headers: &[],
    },
];

impl ProviderProfile {
    /// Looks up a built-in profile by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<&'static Self> {
        PROFILES.iter().find(|profile| profile.name == name)
    }

    /// Returns the names of all built-in profiles, sorted.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        PROFILES.iter().map(|profile| profile.name).collect()
    }

    /// Returns the profile name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the provider key agents built from this profile use.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the endpoint base URL, if the profile pins one.
    #[must_use]
    pub const fn base_url(&self) -> Option<&'static str> {
        self.base_url
    }

    /// Returns the environment variable holding the API key.
    #[must_use]
    pub const fn api_key_env(&self) -> Option<&'static str> {
        self.api_key_env
    }

    /// Returns the extra request headers as an owned map.
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }
}
