//! HTTP client for the Pingdom REST API.

use crate::checks::Checks;
use crate::config::{ClientConfig, DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_SESSION_BASE_URL};
use crate::contacts::Contacts;
use crate::credential::{resolve_auth, AuthMode, Credential};
use crate::error::Result;
use crate::handshake::obtain_session_token;
use crate::helpers::encode_query;
use crate::integrations::Integrations;
use crate::maintenance::Maintenance;
use crate::occurrences::Occurrences;
use crate::probes::Probes;
use crate::response::{classify, decode, RawResponse};
use crate::teams::Teams;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, Request};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Single-valued query parameters.
pub type Params = HashMap<String, String>;
/// Query parameters whose keys may repeat (`a=1&a=2`).
pub type MultiParams = HashMap<String, Vec<String>>;

/// Pingdom API client.
///
/// The credential is fixed at construction: either a static bearer token or a
/// session token obtained by logging in. Nothing is mutated afterwards, so a
/// client can be cloned and shared freely.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    credential: Credential,
    auth_header: (HeaderName, HeaderValue),
    http: HttpClient,
}

impl Client {
    /// Build a client, resolving unset credentials from the process environment.
    ///
    /// Without a static token this performs the session login before
    /// returning; any failure there aborts construction.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        Self::with_env(config, |name| std::env::var(name).ok()).await
    }

    /// Like [`Client::new`] with an explicit environment lookup.
    pub async fn with_env<F>(config: ClientConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = resolve_auth(&config, env)?;
        let default_base = match mode {
            AuthMode::Static(_) => DEFAULT_API_URL,
            AuthMode::Session(_) => DEFAULT_SESSION_BASE_URL,
        };
        let base_url = non_empty(config.base_url).unwrap_or_else(|| default_base.to_string());
        Url::parse(&base_url)?;

        let http = match config.http_client {
            Some(http) => http,
            None => default_http_client()?,
        };

        let credential = match mode {
            AuthMode::Static(token) => Credential::StaticToken(token),
            AuthMode::Session(login) => {
                let auth_url =
                    non_empty(config.auth_url).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
                let token = obtain_session_token(&http, &base_url, &auth_url, &login).await?;
                Credential::SessionToken(token)
            }
        };

        Self::assemble(base_url, credential, http)
    }

    /// Build a client around an already known credential, skipping resolution
    /// and login (e.g. to reuse a session token).
    pub fn from_credential(
        base_url: impl Into<String>,
        credential: Credential,
        http: Option<HttpClient>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;
        let http = match http {
            Some(http) => http,
            None => default_http_client()?,
        };
        Self::assemble(base_url, credential, http)
    }

    fn assemble(base_url: String, credential: Credential, http: HttpClient) -> Result<Self> {
        let auth_header = credential.header()?;
        debug!(%base_url, session = credential.is_session(), "client ready");
        Ok(Self {
            base_url,
            credential,
            auth_header,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Request with optional single-valued query parameters.
    ///
    /// `path` is appended to the base URL as-is. Given parameters replace any
    /// query already present in `path`.
    pub fn new_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Request> {
        let mut url = self.resource_url(path)?;
        if let Some(params) = params {
            set_query(&mut url, encode_query(params.iter()));
        }
        Ok(self.authorize(Request::new(method, url)))
    }

    /// Request whose query parameters may repeat a key once per value.
    pub fn new_request_multi(
        &self,
        method: Method,
        path: &str,
        params: Option<&MultiParams>,
    ) -> Result<Request> {
        let mut url = self.resource_url(path)?;
        if let Some(params) = params {
            let pairs = params
                .iter()
                .flat_map(|(k, values)| values.iter().map(move |v| (k, v)));
            set_query(&mut url, encode_query(pairs));
        }
        Ok(self.authorize(Request::new(method, url)))
    }

    /// Request carrying a pre-serialized JSON body.
    pub fn new_json_request(
        &self,
        method: Method,
        path: &str,
        body: impl Into<String>,
    ) -> Result<Request> {
        let url = self.resource_url(path)?;
        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(body.into().into());
        Ok(self.authorize(request))
    }

    /// Send `request` and decode a 2xx body into `target`.
    ///
    /// On a non-2xx status the classified [`Error::Api`](crate::Error::Api)
    /// is returned and `target` is left untouched. Passing `None` for
    /// `target` fails with [`Error::NoTarget`](crate::Error::NoTarget).
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: Request,
        target: Option<&mut T>,
    ) -> Result<RawResponse> {
        let response = self.send(request).await?;
        decode(&response, target)?;
        Ok(response)
    }

    /// Send `request` and return its decoded 2xx body.
    ///
    /// This is [`execute`](Client::execute) with the target always present,
    /// so it cannot fail with `NoTarget`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send and classify without decoding.
    pub async fn send(&self, request: Request) -> Result<RawResponse> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let response = self.http.execute(request).await?;
        let response = RawResponse::read(response).await?;
        debug!(%method, %path, status = response.status.as_u16(), "request completed");
        classify(response)
    }

    pub fn checks(&self) -> Checks<'_> {
        Checks::new(self)
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams::new(self)
    }

    pub fn probes(&self) -> Probes<'_> {
        Probes::new(self)
    }

    pub fn maintenance(&self) -> Maintenance<'_> {
        Maintenance::new(self)
    }

    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences::new(self)
    }

    pub fn integrations(&self) -> Integrations<'_> {
        Integrations::new(self)
    }

    fn resource_url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn authorize(&self, mut request: Request) -> Request {
        let (name, value) = &self.auth_header;
        request.headers_mut().insert(name.clone(), value.clone());
        request
    }
}

fn default_http_client() -> Result<HttpClient> {
    Ok(HttpClient::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(format!("pingdom-rs/{}", crate::VERSION))
        .build()?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn set_query(url: &mut Url, query: String) {
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&query));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::header::{AUTHORIZATION, COOKIE};

    fn token_client() -> Client {
        Client::from_credential(
            "https://api.pingdom.com/api/3.1",
            Credential::StaticToken("my_api_token".into()),
            None,
        )
        .unwrap()
    }

    fn session_client() -> Client {
        Client::from_credential(
            "https://my.pingdom.com",
            Credential::SessionToken("my_jwt_token".into()),
            None,
        )
        .unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn new_request_concatenates_path() {
        let req = token_client()
            .new_request(Method::GET, "/checks", None)
            .unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.url().as_str(), "https://api.pingdom.com/api/3.1/checks");
    }

    #[test]
    fn static_token_sets_bearer_header_only() {
        let req = token_client()
            .new_request(Method::GET, "/checks", None)
            .unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer my_api_token");
        assert!(req.headers().get(COOKIE).is_none());
    }

    #[test]
    fn session_token_sets_cookie_only() {
        let req = session_client()
            .new_request(Method::GET, "/data/v3/integration", None)
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://my.pingdom.com/data/v3/integration"
        );
        assert!(req.headers().get(AUTHORIZATION).is_none());
        let cookies: Vec<_> = req.headers().get_all(COOKIE).iter().collect();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].to_str().unwrap(), "jwt=my_jwt_token");
    }

    #[test]
    fn single_params_are_sorted_and_encoded() {
        let mut params = Params::new();
        params.insert("name".into(), "my check".into());
        params.insert("host".into(), "example.com".into());
        let req = token_client()
            .new_request(Method::POST, "/checks", Some(&params))
            .unwrap();
        assert_eq!(req.url().query(), Some("host=example.com&name=my+check"));
    }

    #[test]
    fn multi_params_repeat_keys() {
        let mut params = MultiParams::new();
        params.insert("a".into(), vec!["1".into(), "2".into()]);
        let req = token_client()
            .new_request_multi(Method::DELETE, "/maintenance.occurrences", Some(&params))
            .unwrap();
        assert_eq!(req.url().query(), Some("a=1&a=2"));
    }

    #[test]
    fn empty_params_leave_no_query() {
        let req = token_client()
            .new_request(Method::GET, "/probes", Some(&Params::new()))
            .unwrap();
        assert_eq!(req.url().query(), None);
    }

    #[test]
    fn json_request_sets_content_type_and_body() {
        let req = token_client()
            .new_json_request(Method::POST, "/alerting/teams", r#"{"name":"ops"}"#)
            .unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer my_api_token");
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"name":"ops"}"#);
    }

    #[test]
    fn building_twice_yields_identical_independent_requests() {
        let client = token_client();
        let mut params = Params::new();
        params.insert("limit".into(), "10".into());
        let mut a = client
            .new_request(Method::GET, "/checks", Some(&params))
            .unwrap();
        let b = client
            .new_request(Method::GET, "/checks", Some(&params))
            .unwrap();
        assert_eq!(a.method(), b.method());
        assert_eq!(a.url(), b.url());
        assert_eq!(a.headers(), b.headers());
        a.headers_mut().remove(AUTHORIZATION);
        assert!(b.headers().get(AUTHORIZATION).is_some());
    }

    #[test]
    fn malformed_path_fails() {
        let r = session_client().new_request(Method::GET, ":99999/checks", None);
        assert!(matches!(r, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn static_token_uses_api_url_by_default() {
        let c = Client::with_env(ClientConfig::new().with_api_token("token"), no_env)
            .await
            .unwrap();
        assert_eq!(c.base_url(), DEFAULT_API_URL);
        assert_eq!(c.credential(), &Credential::StaticToken("token".into()));
    }

    #[tokio::test]
    async fn both_tokens_prefer_only_token() {
        let cfg = ClientConfig::new()
            .with_api_token("token")
            .with_api_token_only("token_only");
        let c = Client::with_env(cfg, no_env).await.unwrap();
        let req = c.new_request(Method::GET, "/", None).unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer token_only");
    }

    #[tokio::test]
    async fn no_credentials_fails() {
        let r = Client::with_env(ClientConfig::new(), no_env).await;
        assert!(matches!(r, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn malformed_base_url_fails() {
        let cfg = ClientConfig::new()
            .with_api_token("token")
            .with_base_url("not a url");
        let r = Client::with_env(cfg, no_env).await;
        assert!(matches!(r, Err(Error::InvalidUrl(_))));
    }
}
