//! CInP over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::CinpError;
use crate::transport::{Created, ListPage, Object, Transport};
use crate::uri;

/// Protocol version sent with every request.
const CINP_VERSION: &str = "1.0";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Model handling session login and logout.
const AUTH_USER_URI: &str = "/api/v1/Auth/User";

/// Connection options for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Proxy URL applied to all requests.
    pub proxy: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Per request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            insecure: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Authenticated session.
#[derive(Debug, Clone)]
struct Session {
    username: String,
    token: String,
}

/// CInP client speaking HTTP to a single server.
#[derive(Debug, Clone)]
pub struct Client {
    /// HTTP client.
    http: reqwest::Client,
    /// Scheme, host and port, without a trailing slash.
    base_url: String,
    /// Session headers, set by [`Client::login`].
    session: Option<Session>,
}

impl Client {
    /// Create a client for the server at `base_url` (e.g. `https://contractor:443`).
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self, CinpError> {
        let parsed =
            Url::parse(base_url).map_err(|e| CinpError::InvalidUri(format!("{base_url}: {e}")))?;
        if parsed.host_str().is_none() {
            return Err(CinpError::InvalidUri(format!("{base_url}: missing host")));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure);
        if let Some(proxy) = &options.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and keep the session token for subsequent requests.
    ///
    /// # Errors
    /// Returns error if the server rejects the credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), CinpError> {
        info!(username = %username, "Logging in");

        let mut args = Object::new();
        args.insert("username".into(), json!(username));
        args.insert("password".into(), json!(password));

        let result = self
            .call(&uri::build(AUTH_USER_URI, &[], Some("login")), &args)
            .await?;
        let token = result
            .as_str()
            .ok_or_else(|| CinpError::Protocol("login did not return a token".into()))?;

        self.session = Some(Session {
            username: username.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    /// End the current session. Does nothing when not logged in.
    ///
    /// # Errors
    /// Returns error if the logout call fails.
    pub async fn logout(&self) -> Result<(), CinpError> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        info!(username = %session.username, "Logging out");

        let mut args = Object::new();
        args.insert("username".into(), json!(session.username));
        args.insert("token".into(), json!(session.token));

        self.call(&uri::build(AUTH_USER_URI, &[], Some("logout")), &args)
            .await?;
        Ok(())
    }

    /// Send one request and check the response status.
    async fn request(
        &self,
        verb: &str,
        uri: &str,
        body: Option<&Object>,
        headers: &[(&str, String)],
    ) -> Result<(HeaderMap, Value), CinpError> {
        let method = Method::from_bytes(verb.as_bytes())
            .map_err(|e| CinpError::Protocol(format!("invalid verb {verb}: {e}")))?;
        let url = format!("{}{uri}", self.base_url);
        debug!(verb = %verb, url = %url, "CInP request");

        let mut request = self
            .http
            .request(method, &url)
            .header("CInP-Version", CINP_VERSION)
            .header("Accept", "application/json")
            .header("Accept-Charset", "utf-8");
        if let Some(session) = &self.session {
            request = request
                .header("Auth-Id", &session.username)
                .header("Auth-Token", &session.token);
        }
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json;charset=utf-8")
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        Self::handle_response(uri, response).await
    }

    /// Map the response status onto the protocol's error kinds.
    async fn handle_response(
        uri: &str,
        response: Response,
    ) -> Result<(HeaderMap, Value), CinpError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if (200..300).contains(&status) {
            if text.trim().is_empty() {
                return Ok((headers, Value::Null));
            }
            let value = serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                CinpError::Serialization(e)
            })?;
            return Ok((headers, value));
        }

        let detail: Option<Value> = serde_json::from_str(&text).ok();
        let message = detail
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| text.clone(), ToString::to_string);

        Err(match status {
            400 => CinpError::InvalidRequest {
                message,
                data: detail.and_then(|mut d| d.get_mut("data").map(Value::take)),
            },
            401 => CinpError::InvalidSession,
            403 => CinpError::NotAuthorized(message),
            404 => CinpError::NotFound(uri.to_string()),
            500 => CinpError::Server { message },
            _ => CinpError::UnexpectedStatus { status, body: text },
        })
    }

    /// Read a numeric pagination header.
    fn header_usize(headers: &HeaderMap, name: &str) -> Result<usize, CinpError> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| CinpError::Protocol(format!("missing or invalid {name} header")))
    }

    fn expect_object(value: Value) -> Result<Object, CinpError> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(CinpError::Protocol(format!(
                "expected an object, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, uri: &str) -> Result<Object, CinpError> {
        let (_, value) = self.request("GET", uri, None, &[]).await?;
        Self::expect_object(value)
    }

    async fn get_multi(&self, uris: &[String]) -> Result<Object, CinpError> {
        let Some(first) = uris.first() else {
            return Ok(Object::new());
        };

        let model_path = uri::parse(first)?.model_path();
        let mut ids = Vec::with_capacity(uris.len());
        for item in uris {
            let parsed = uri::parse(item)?;
            if parsed.model_path() != model_path {
                return Err(CinpError::InvalidUri(format!(
                    "{item} is not a {model_path} object"
                )));
            }
            ids.extend(parsed.ids);
        }
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

        let (_, value) = self
            .request(
                "GET",
                &uri::build(&model_path, &id_refs, None),
                None,
                &[("Multi-Object", "True".to_string())],
            )
            .await?;
        Self::expect_object(value)
    }

    async fn list(
        &self,
        uri: &str,
        filter: Option<&str>,
        values: &Object,
        position: usize,
        count: usize,
    ) -> Result<ListPage, CinpError> {
        let mut headers = vec![
            ("Position", position.to_string()),
            ("Count", count.to_string()),
        ];
        if let Some(filter) = filter {
            headers.push(("Filter", filter.to_string()));
        }
        let body = filter.map(|_| values);

        let (response_headers, value) = self.request("LIST", uri, body, &headers).await?;
        let uris: Vec<String> = serde_json::from_value(value)?;

        Ok(ListPage {
            position: Self::header_usize(&response_headers, "Position")?,
            count: Self::header_usize(&response_headers, "Count")?,
            total: Self::header_usize(&response_headers, "Total")?,
            uris,
        })
    }

    async fn create(&self, uri: &str, values: &Object) -> Result<Created, CinpError> {
        let (headers, value) = self.request("CREATE", uri, Some(values), &[]).await?;
        let object_uri = headers
            .get("Object-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CinpError::Protocol("CREATE response without Object-Id".into()))?
            .to_string();

        info!(uri = %object_uri, "Object created");
        Ok(Created {
            uri: object_uri,
            values: Self::expect_object(value)?,
        })
    }

    async fn update(&self, uri: &str, values: &Object) -> Result<Object, CinpError> {
        let (_, value) = self.request("UPDATE", uri, Some(values), &[]).await?;
        info!(uri = %uri, fields = values.len(), "Object updated");
        Self::expect_object(value)
    }

    async fn delete(&self, uri: &str) -> Result<(), CinpError> {
        self.request("DELETE", uri, None, &[]).await?;
        info!(uri = %uri, "Object deleted");
        Ok(())
    }

    async fn call(&self, uri: &str, args: &Object) -> Result<Value, CinpError> {
        let (_, value) = self.request("CALL", uri, Some(args), &[]).await?;
        Ok(value)
    }
}
