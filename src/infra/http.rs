//! Authorized request primitive shared by every entity binding.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ips_rest_types::Hello;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ClientSettings;
use crate::domain::error::ClientError;
use crate::infra::params::Params;

/// The API authenticates on the username half of Basic auth; the password is ignored.
const BASIC_AUTH_PASSWORD: &str = "thisIsNotImportant";

/// Transport options that change how the underlying HTTP client is built.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Skip TLS certificate validation. Only meant for communities served
    /// with self-signed certificates on trusted networks.
    pub accept_invalid_certs: bool,
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base: String,
    key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base)
            .field("key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(site: &str, key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(site, key, &ClientOptions::default())
    }

    pub fn with_options(
        site: &str,
        key: impl Into<String>,
        options: &ClientOptions,
    ) -> Result<Self, ClientError> {
        let parsed = Url::parse(site)?;
        let base = parsed.as_str().trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder().user_agent(Self::user_agent());
        if options.accept_invalid_certs {
            warn!(site = %base, "TLS certificate validation disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base,
            key: key.into(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let options = ClientOptions {
            accept_invalid_certs: settings.accept_invalid_certs,
        };
        Self::with_options(
            settings.base_url.as_str(),
            settings.api_key.clone(),
            &options,
        )
    }

    pub fn user_agent() -> &'static str {
        concat!("ips-rest/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn auth_header(&self) -> Result<HeaderValue, ClientError> {
        let credentials = STANDARD.encode(format!("{}:{BASIC_AUTH_PASSWORD}", self.key));
        HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| ClientError::Header(e.to_string()))
    }

    /// Compose `<base>/api<path>` with `params` encoded into the query string.
    pub fn url(&self, path: &str, params: &Params) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/api{path}", self.base))?;
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in &pairs {
                qp.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Issue one authorized call and return the decoded JSON body.
    ///
    /// Parameters are always sent in the query string. A body carrying an
    /// `errorCode` is turned into [`ClientError::Api`] whatever the status.
    #[instrument(skip(self, params, method), fields(method = %method))]
    pub async fn authorized_request(
        &self,
        path: &str,
        params: &Params,
        method: Method,
    ) -> Result<Value, ClientError> {
        let url = self.url(path, params)?;
        debug!(%url, "sending request");

        let resp = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.auth_header()?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            warn!(%status, path, "non-success status from API");
        }

        let body: Value = serde_json::from_slice(&bytes)?;
        if let Some(err) = api_error(&body) {
            return Err(err);
        }
        Ok(body)
    }

    pub async fn get(&self, path: &str, params: &Params) -> Result<Value, ClientError> {
        self.authorized_request(path, params, Method::GET).await
    }

    pub async fn hello(&self) -> Result<Hello, ClientError> {
        let body = self.get("/core/hello", &Params::new()).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn api_error(body: &Value) -> Option<ClientError> {
    let code = match body.get("errorCode")? {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::Number(n) if n.as_i64() == Some(0) => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = body
        .get("errorMessage")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(ClientError::api(code, message))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn auth_header_is_basic_with_key_as_username() -> Result<(), ClientError> {
        let client = Client::new("https://community.test", "secret")?;
        let header = client.auth_header()?;
        let expected = format!("Basic {}", STANDARD.encode("secret:thisIsNotImportant"));
        assert_eq!(header.to_str().expect("header str"), expected);
        Ok(())
    }

    #[test]
    fn url_prefixes_api_and_trims_trailing_slash() -> Result<(), ClientError> {
        let client = Client::new("https://community.test/forum/", "k")?;
        let url = client.url("/core/members/5", &Params::new())?;
        assert_eq!(url.as_str(), "https://community.test/forum/api/core/members/5");
        Ok(())
    }

    #[test]
    fn url_drops_null_params() -> Result<(), ClientError> {
        let client = Client::new("https://community.test", "k")?;
        let mut params = Params::new();
        params.set("a", 1).set("b", Value::Null);
        let url = client.url("/forums/topics", &params)?;
        assert_eq!(url.query(), Some("a=1"));
        Ok(())
    }

    #[test]
    fn api_error_requires_truthy_code() {
        assert!(api_error(&json!({"errorCode": null})).is_none());
        assert!(api_error(&json!({"errorCode": ""})).is_none());
        assert!(api_error(&json!({"id": 3})).is_none());

        let err = api_error(&json!({"errorCode": "3S290/1", "errorMessage": "INVALID_ID"}))
            .expect("api error");
        assert_eq!(err.api_code(), Some("3S290/1"));
    }

    #[test]
    fn invalid_site_is_rejected() {
        let err = Client::new("not a url", "k").expect_err("invalid url");
        assert!(matches!(err, ClientError::Url(_)));
    }

    #[test]
    fn debug_output_redacts_key() -> Result<(), ClientError> {
        let client = Client::new("https://community.test", "very-secret")?;
        assert!(!format!("{client:?}").contains("very-secret"));
        Ok(())
    }
}
