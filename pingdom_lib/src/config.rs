//! Client configuration and the defaults it falls back to.

use std::fmt;

/// Base URL for token-authenticated API access.
pub const DEFAULT_API_URL: &str = "https://api.pingdom.com/api/3.1";
/// Base URL for the session-login flow and the endpoints it unlocks.
pub const DEFAULT_SESSION_BASE_URL: &str = "https://my.pingdom.com";
/// Endpoint that accepts user credentials during session login.
pub const DEFAULT_AUTH_URL: &str = "https://my.solarwinds.cloud/v1/login";

pub const ENV_API_TOKEN: &str = "PINGDOM_API_TOKEN";
pub const ENV_API_TOKEN_ONLY: &str = "PINGDOM_API_TOKEN_ONLY";
pub const ENV_USERNAME: &str = "SOLARWINDS_USER";
pub const ENV_PASSWORD: &str = "SOLARWINDS_PASSWD";
pub const ENV_ORG_ID: &str = "SOLARWINDS_ORG_ID";

/// Inputs for [`Client::new`](crate::Client::new).
///
/// Every credential field is optional here; empty strings count as unset.
/// Unset credentials are looked up in the environment (see the `ENV_*`
/// constants) when the client is built.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_token: Option<String>,
    pub api_token_only: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub org_id: Option<String>,
    pub base_url: Option<String>,
    pub auth_url: Option<String>,
    /// Transport to use instead of the default one. Session login only works
    /// if this client does not follow redirects.
    pub http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_api_token_only(mut self, token: impl Into<String>) -> Self {
        self.api_token_only = Some(token.into());
        self
    }

    /// Set username, password and organization id for session login.
    #[must_use]
    pub fn with_login(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        org_id: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.org_id = Some(org_id.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http_client = Some(http);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ClientConfig")
            .field("api_token", &redact(&self.api_token))
            .field("api_token_only", &redact(&self.api_token_only))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("org_id", &self.org_id)
            .field("base_url", &self.base_url)
            .field("auth_url", &self.auth_url)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Explicit non-empty value, else non-empty value from `env`.
pub(crate) fn resolve_value<F>(explicit: Option<&str>, var: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|v| !v.is_empty())
        .map(String::from)
        .or_else(|| env(var).filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |k| {
            pairs
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn explicit_value_wins_over_env() {
        let env = env_of(&[(ENV_API_TOKEN, "envSetToken")]);
        assert_eq!(
            resolve_value(Some("explicitToken"), ENV_API_TOKEN, &env),
            Some("explicitToken".to_string())
        );
    }

    #[test]
    fn empty_explicit_value_falls_back_to_env() {
        let env = env_of(&[(ENV_API_TOKEN, "envSetToken")]);
        assert_eq!(
            resolve_value(Some(""), ENV_API_TOKEN, &env),
            Some("envSetToken".to_string())
        );
        assert_eq!(
            resolve_value(None, ENV_API_TOKEN, &env),
            Some("envSetToken".to_string())
        );
    }

    #[test]
    fn empty_env_value_is_absent() {
        let env = env_of(&[(ENV_API_TOKEN, "")]);
        assert_eq!(resolve_value(None, ENV_API_TOKEN, &env), None);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = ClientConfig::new()
            .with_api_token("secret-token")
            .with_login("user", "hunter2", "42");
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("secret-token"));
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("user"));
    }
}
