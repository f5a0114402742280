//! Session login: trades username, password and organization id for a
//! session token by walking the single-sign-on redirect chain by hand.
//!
//! The flow needs a transport that does not follow redirects: the login
//! state lives in the `Set-Cookie` and `Location` headers of the redirect
//! responses themselves.

use crate::credential::{SessionLogin, SESSION_COOKIE};
use crate::error::{Error, HandshakeStep, Result};
use crate::helpers::{cookie_header, encode_query, response_cookie};
use crate::response::{classify, RawResponse};
use reqwest::header::{COOKIE, LOCATION};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

const LOGIN_PATH: &str = "/auth/login";
const CALLBACK_PATH: &str = "/auth/swicus/callback";
/// Cookie set by the login endpoint to tie the redirect chain together.
pub const LOGIN_SESSION_COOKIE: &str = "pingdom_login_session_id";
/// Cookie telling the callback which organization to log into.
pub const ORG_ID_COOKIE: &str = "login_session_swicus_org_id";

#[derive(Serialize)]
struct AuthPayload<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "loginQueryParams")]
    login_query_params: &'a str,
}

#[derive(Deserialize)]
struct AuthResult {
    #[serde(rename = "RedirectUrl", alias = "redirectUrl")]
    redirect_url: String,
}

/// Run the login handshake and return the session token.
pub(crate) async fn obtain_session_token(
    http: &reqwest::Client,
    base_url: &str,
    auth_url: &str,
    login: &SessionLogin,
) -> Result<String> {
    let (session_id, login_query) = initiate(http, base_url)
        .await
        .map_err(|e| Error::handshake(HandshakeStep::Initiate, e))?;

    let redirect = submit_credentials(http, auth_url, login, &login_query)
        .await
        .map_err(|e| Error::handshake(HandshakeStep::Credentials, e))?;

    let token = callback(http, base_url, &redirect, &session_id, &login.org_id)
        .await
        .map_err(|e| Error::handshake(HandshakeStep::Callback, e))?;

    debug!("session login complete");
    Ok(token)
}

/// Step 1: fetch the session cookie and the login parameters from the redirect.
async fn initiate(http: &reqwest::Client, base_url: &str) -> Result<(String, String)> {
    let url = Url::parse(&format!("{}{}", base_url, LOGIN_PATH))?;
    debug!(%url, "session login: initiating");
    let response = http.get(url.clone()).send().await?;
    let session_id = response_cookie(&response, LOGIN_SESSION_COOKIE);
    let response = RawResponse::read(response).await?;

    let location = response
        .headers
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::MissingLocation)?;
    let location = url.join(location)?;

    let session_id =
        session_id.ok_or_else(|| Error::MissingCookie(LOGIN_SESSION_COOKIE.to_string()))?;

    Ok((session_id, encode_query(location.query_pairs())))
}

/// Step 2: post the credentials; the answer names the callback to visit.
async fn submit_credentials(
    http: &reqwest::Client,
    auth_url: &str,
    login: &SessionLogin,
    login_query: &str,
) -> Result<Url> {
    let url = Url::parse(auth_url)?;
    debug!(%url, "session login: submitting credentials");
    let payload = AuthPayload {
        email: &login.username,
        password: &login.password,
        login_query_params: login_query,
    };
    let response = http.post(url.clone()).json(&payload).send().await?;
    let response = RawResponse::read(response).await?;
    let response = classify(response)?;
    let result: AuthResult = serde_json::from_slice(&response.body)?;
    // May be relative; only its query is used.
    Ok(url.join(&result.redirect_url)?)
}

/// Steps 3 and 4: call back with both cookies and pick up the token cookie.
async fn callback(
    http: &reqwest::Client,
    base_url: &str,
    redirect: &Url,
    session_id: &str,
    org_id: &str,
) -> Result<String> {
    let url = Url::parse(&format!(
        "{}{}?{}",
        base_url,
        CALLBACK_PATH,
        encode_query(redirect.query_pairs())
    ))?;
    let cookies = cookie_header(&[
        (LOGIN_SESSION_COOKIE, session_id),
        (ORG_ID_COOKIE, org_id),
    ])?;

    debug!(path = CALLBACK_PATH, "session login: calling back");
    let response = http.get(url).header(COOKIE, cookies).send().await?;
    let token = response_cookie(&response, SESSION_COOKIE);
    RawResponse::read(response).await?;

    token.ok_or_else(|| Error::MissingCookie(SESSION_COOKIE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_payload_wire_names() {
        let payload = AuthPayload {
            email: "user@example.com",
            password: "pwd",
            login_query_params: "a=1",
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "email": "user@example.com",
                "password": "pwd",
                "loginQueryParams": "a=1"
            })
        );
    }

    #[test]
    fn auth_result_accepts_both_casings() {
        let a: AuthResult =
            serde_json::from_str(r#"{"RedirectUrl": "https://x/cb?code=1"}"#).unwrap();
        let b: AuthResult =
            serde_json::from_str(r#"{"redirectUrl": "/cb?code=1"}"#).unwrap();
        assert_eq!(a.redirect_url, "https://x/cb?code=1");
        assert_eq!(b.redirect_url, "/cb?code=1");
    }
}
