//! Open, provider-specific credential map.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Recognised credential keys.
///
/// Providers read the keys they understand and ignore everything else.
pub mod keys {
    /// Execution-mode selector for the SDK provider (`query` or `client`).
    pub const MODE: &str = "mode";
    /// Literal API key.
    pub const API_KEY: &str = "api_key";
    /// Name of the environment variable holding the API key.
    pub const API_KEY_ENV: &str = "api_key_env";
    /// Base URL override for HTTP backends.
    pub const BASE_URL: &str = "base_url";
    /// Built-in provider profile name.
    pub const PROFILE: &str = "profile";
    /// Object of extra HTTP headers sent with every request.
    pub const DEFAULT_HEADERS: &str = "default_headers";
}

/// Typed key-value container for provider-specific settings.
///
/// Values are JSON so callers can pass strings, numbers or nested objects
/// without the core knowing every provider's schema. `Debug` output redacts
/// the literal API key.
///
/// # Examples
///
/// ```
/// use maestro::agent::domain::{Credentials, credential_keys};
///
/// let credentials = Credentials::new()
///     .with(credential_keys::MODE, "client")
///     .with(credential_keys::API_KEY, "sk-secret");
///
/// assert_eq!(credentials.get_str(credential_keys::MODE), Some("client"));
/// assert!(!format!("{credentials:?}").contains("sk-secret"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, Value>);

impl Credentials {
    /// Creates an empty credential map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the map with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value for `key` when it is a non-blank string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns the string-valued entries of the `default_headers` object.
    ///
    /// Non-string header values are skipped.
    #[must_use]
    pub fn default_headers(&self) -> BTreeMap<String, String> {
        self.0
            .get(keys::DEFAULT_HEADERS)
            .and_then(Value::as_object)
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|v| (name.clone(), v.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` when no entries are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.0 {
            if key == keys::API_KEY {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_strings_read_as_absent() {
        let credentials = Credentials::new().with(keys::BASE_URL, "   ");
        assert_eq!(credentials.get_str(keys::BASE_URL), None);
    }

    #[test]
    fn non_string_values_are_not_strings() {
        let credentials = Credentials::new().with(keys::MODE, 3);
        assert_eq!(credentials.get_str(keys::MODE), None);
        assert_eq!(credentials.get(keys::MODE), Some(&json!(3)));
    }

    #[test]
    fn default_headers_keep_string_values_only() {
        let credentials = Credentials::new().with(
            keys::DEFAULT_HEADERS,
            json!({"X-Title": "maestro", "X-Retries": 3}),
        );

        let headers = credentials.default_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Title").map(String::as_str), Some("maestro"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let credentials = Credentials::new()
            .with(keys::API_KEY, "sk-live-123")
            .with(keys::PROFILE, "openrouter");

        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("sk-live-123"));
        assert!(rendered.contains("openrouter"));
    }
}
