//! Credential resolution: which of the two authentication modes a client uses.

use crate::config::{
    resolve_value, ClientConfig, ENV_API_TOKEN, ENV_API_TOKEN_ONLY, ENV_ORG_ID, ENV_PASSWORD,
    ENV_USERNAME,
};
use crate::error::{Error, Result};
use crate::helpers::{cookie_header, is_cookie_value};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, COOKIE};
use std::fmt;
use tracing::warn;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "jwt";

/// The credential a client stamps on every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Caller-supplied token, sent as `Authorization: Bearer <token>`.
    StaticToken(String),
    /// Token obtained by session login, sent as the `jwt` cookie.
    SessionToken(String),
}

impl Credential {
    /// The single header this credential adds to a request.
    pub(crate) fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        match self {
            Credential::StaticToken(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    Error::Config("API token contains characters not allowed in a header".into())
                })?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
            Credential::SessionToken(token) => {
                Ok((COOKIE, cookie_header(&[(SESSION_COOKIE, token)])?))
            }
        }
    }

    pub fn is_session(&self) -> bool {
        matches!(self, Credential::SessionToken(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::StaticToken(_) => f.write_str("StaticToken(<redacted>)"),
            Credential::SessionToken(_) => f.write_str("SessionToken(<redacted>)"),
        }
    }
}

/// Username, password and organization id for session login.
#[derive(Clone)]
pub(crate) struct SessionLogin {
    pub username: String,
    pub password: String,
    pub org_id: String,
}

/// Outcome of resolving a config against the environment.
pub(crate) enum AuthMode {
    Static(String),
    Session(SessionLogin),
}

/// Pick the authentication mode for `config`, consulting `env` for unset fields.
///
/// The "only" token beats the primary token; with neither, all three session
/// fields are required.
pub(crate) fn resolve_auth<F>(config: &ClientConfig, env: F) -> Result<AuthMode>
where
    F: Fn(&str) -> Option<String>,
{
    let primary = resolve_value(config.api_token.as_deref(), ENV_API_TOKEN, &env);
    let only = resolve_value(config.api_token_only.as_deref(), ENV_API_TOKEN_ONLY, &env);

    match (only, primary) {
        (Some(only), Some(_)) => {
            warn!("both API tokens are set; using {}", ENV_API_TOKEN_ONLY);
            return Ok(AuthMode::Static(only));
        }
        (Some(token), None) | (None, Some(token)) => return Ok(AuthMode::Static(token)),
        (None, None) => {}
    }

    let username = resolve_value(config.username.as_deref(), ENV_USERNAME, &env);
    let password = resolve_value(config.password.as_deref(), ENV_PASSWORD, &env);
    let org_id = resolve_value(config.org_id.as_deref(), ENV_ORG_ID, &env);

    match (username, password, org_id) {
        (Some(username), Some(password), Some(org_id)) => {
            if !is_cookie_value(&org_id) {
                return Err(Error::Config(format!(
                    "{} must not contain whitespace, quotes, commas or semicolons",
                    ENV_ORG_ID
                )));
            }
            Ok(AuthMode::Session(SessionLogin {
                username,
                password,
                org_id,
            }))
        }
        (username, password, org_id) => {
            let missing: Vec<&str> = [
                (username.is_none(), ENV_USERNAME),
                (password.is_none(), ENV_PASSWORD),
                (org_id.is_none(), ENV_ORG_ID),
            ]
            .iter()
            .filter(|(absent, _)| *absent)
            .map(|(_, name)| *name)
            .collect();
            Err(Error::Config(format!(
                "no credentials: set {} or {}, or provide session login ({} missing)",
                ENV_API_TOKEN,
                ENV_API_TOKEN_ONLY,
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn static_token(mode: AuthMode) -> String {
        match mode {
            AuthMode::Static(t) => t,
            AuthMode::Session(_) => panic!("expected static token"),
        }
    }

    #[test]
    fn primary_token_only() {
        let cfg = ClientConfig::new().with_api_token("token");
        assert_eq!(static_token(resolve_auth(&cfg, no_env).unwrap()), "token");
    }

    #[test]
    fn only_token_wins_over_primary() {
        let cfg = ClientConfig::new()
            .with_api_token("token")
            .with_api_token_only("token_only");
        assert_eq!(static_token(resolve_auth(&cfg, no_env).unwrap()), "token_only");
    }

    #[test]
    fn env_only_token_wins_over_explicit_primary() {
        let cfg = ClientConfig::new().with_api_token("token");
        let env = |k: &str| (k == ENV_API_TOKEN_ONLY).then(|| "envSetTokenOnly".to_string());
        assert_eq!(static_token(resolve_auth(&cfg, env).unwrap()), "envSetTokenOnly");
    }

    #[test]
    fn env_token_used_when_config_empty() {
        let env = |k: &str| (k == ENV_API_TOKEN).then(|| "envSetToken".to_string());
        assert_eq!(
            static_token(resolve_auth(&ClientConfig::new(), env).unwrap()),
            "envSetToken"
        );
    }

    #[test]
    fn session_login_from_env() {
        let env = |k: &str| match k {
            ENV_USERNAME => Some("user".to_string()),
            ENV_PASSWORD => Some("pwd".to_string()),
            ENV_ORG_ID => Some("org".to_string()),
            _ => None,
        };
        match resolve_auth(&ClientConfig::new(), env).unwrap() {
            AuthMode::Session(login) => {
                assert_eq!(login.username, "user");
                assert_eq!(login.password, "pwd");
                assert_eq!(login.org_id, "org");
            }
            AuthMode::Static(_) => panic!("expected session login"),
        }
    }

    #[test]
    fn nothing_resolvable_is_config_error() {
        let err = match resolve_auth(&ClientConfig::new(), no_env) {
            Err(e) => e,
            Ok(_) => panic!("expected config error"),
        };
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn partial_session_login_names_missing_fields() {
        let cfg = ClientConfig {
            username: Some("user".into()),
            ..ClientConfig::default()
        };
        let err = match resolve_auth(&cfg, no_env) {
            Err(e) => e.to_string(),
            Ok(_) => panic!("expected config error"),
        };
        assert!(err.contains(ENV_PASSWORD));
        assert!(err.contains(ENV_ORG_ID));
        assert!(!err.contains(ENV_USERNAME));
    }

    #[test]
    fn static_header_is_bearer() {
        let (name, value) = Credential::StaticToken("abc".into()).header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn session_header_is_jwt_cookie() {
        let (name, value) = Credential::SessionToken("abc".into()).header().unwrap();
        assert_eq!(name, COOKIE);
        assert_eq!(value.to_str().unwrap(), "jwt=abc");
    }

    #[test]
    fn header_rejects_control_characters() {
        assert!(matches!(
            Credential::StaticToken("bad\ntoken".into()).header(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn session_header_rejects_cookie_separators() {
        assert!(matches!(
            Credential::SessionToken("abc; other=1".into()).header(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn org_id_with_cookie_separators_is_rejected() {
        for org_id in ["org; jwt=evil", "org,1", "my org", "\"org\""] {
            let cfg = ClientConfig::new().with_login("user", "pwd", org_id);
            match resolve_auth(&cfg, no_env) {
                Err(Error::Config(msg)) => assert!(msg.contains(ENV_ORG_ID)),
                Err(e) => panic!("expected config error for {:?}, got {}", org_id, e),
                Ok(_) => panic!("expected config error for {:?}", org_id),
            }
        }
    }

    #[test]
    fn debug_is_redacted() {
        let dbg = format!("{:?}", Credential::StaticToken("s3cret".into()));
        assert!(!dbg.contains("s3cret"));
    }
}
