//! Request builder: turns a route, a method, a payload and an optional session
//! into a [`RequestDescriptor`] the transport can send as-is.
//!
//! Building is pure. Every request carries `Content-Type: application/json`.
//! `GET` payloads go into the query string and the descriptor has no body;
//! every other method sends the payload as a JSON body (`"{}"` when empty).
//! A session is sent as a `Cookie` header and switches the request to
//! credentialed mode so cookies travel cross-origin. Without a session the
//! builder's own credentials policy applies; a browser client whose session
//! cookie is `HttpOnly` sets it to [`Credentials::Include`].

use serde_json::Value;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

pub mod payload;
pub mod route;

pub use payload::Payload;
pub use route::expand_route;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const COOKIE: &str = "Cookie";

/// Cookie name under which the backend issues the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the transport should include cookies on cross-origin requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    SameOrigin,
    Include,
}

/// A session credential in `Cookie` header form, e.g. `token=abc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Session(cookie.into())
    }

    pub fn from_token(token: &str) -> Self {
        Session(format!("{SESSION_COOKIE}={token}"))
    }

    /// Picks the session token out of a `document.cookie` style jar
    /// (`"a=1; token=abc"`). `None` when there is no non-empty token.
    pub fn from_cookie_jar(jar: &str) -> Option<Self> {
        jar.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| Session::from_token(value))
    }

    pub fn cookie_header(&self) -> &str {
        &self.0
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("cannot resolve route `{route}`: {source}")]
    InvalidRoute {
        route: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot serialize request payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("route needs a value for `{0}`")]
    MissingSegment(String),
    #[error("route `{0}` has unresolved placeholders")]
    UnresolvedPlaceholder(String),
}

/// Everything the transport needs to issue one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub credentials: Credentials,
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Builds [`RequestDescriptor`]s against one server address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestBuilder {
    config: ClientConfig,
    credentials: Credentials,
}

impl RequestBuilder {
    /// Creates a builder resolving routes against `config`.
    ///
    /// Requests without a session are sent [`Credentials::SameOrigin`] until
    /// [`with_credentials`](Self::with_credentials) says otherwise.
    pub fn new(config: ClientConfig) -> Self {
        RequestBuilder {
            config,
            credentials: Credentials::default(),
        }
    }

    /// Sets the credentials mode used when no session is passed to
    /// [`build`](Self::build).
    ///
    /// The browser cannot read an `HttpOnly` session cookie, so the web
    /// client asks for [`Credentials::Include`] on every request and lets the
    /// browser attach the cookie itself.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    /// Builds the descriptor for one request.
    ///
    /// # Arguments
    ///
    /// * `route` - Path relative to the server address, e.g. `"groups/"`.
    /// * `method` - `GET` moves `payload` into the query string; any other
    ///   method sends it as the JSON body.
    /// * `session` - When given, sent as a `Cookie` header and forces
    ///   [`Credentials::Include`].
    ///
    /// # Returns
    ///
    /// The descriptor, or a [`RequestError`] when the route does not resolve
    /// or the payload cannot be serialized.
    pub fn build(
        &self,
        route: &str,
        method: Method,
        payload: &Payload,
        session: Option<&Session>,
    ) -> Result<RequestDescriptor, RequestError> {
        let mut url = self
            .config
            .resolve(route)
            .map_err(|source| RequestError::InvalidRoute {
                route: route.to_string(),
                source,
            })?;

        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        let credentials = match session {
            Some(session) => {
                headers.push((COOKIE.to_string(), session.cookie_header().to_string()));
                Credentials::Include
            }
            None => self.credentials,
        };

        let body = if method == Method::Get {
            append_query(&mut url, payload);
            None
        } else {
            Some(payload.to_json_string()?)
        };

        Ok(RequestDescriptor {
            url,
            method,
            headers,
            credentials,
            body,
        })
    }

    /// [`build`](Self::build) with the default method, `POST`.
    pub fn post(
        &self,
        route: &str,
        payload: &Payload,
        session: Option<&Session>,
    ) -> Result<RequestDescriptor, RequestError> {
        self.build(route, Method::default(), payload, session)
    }
}

fn append_query(url: &mut Url, payload: &Payload) {
    if payload.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in payload.iter() {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.append_pair(key, &query_value(item));
                }
            }
            other => {
                pairs.append_pair(key, &query_value(other));
            }
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(ClientConfig::new("http://api.test/").unwrap())
    }

    fn payload(value: Value) -> Payload {
        Payload::from_json(value).unwrap()
    }

    #[test]
    fn default_method_is_post() {
        assert_eq!(Method::default(), Method::Post);
        let request = builder().post("groups/", &Payload::new(), None).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[test]
    fn always_json_content_type() {
        for method in [Method::Get, Method::Post, Method::Delete] {
            let request = builder()
                .build("groups/", method, &Payload::new(), None)
                .unwrap();
            assert_eq!(request.header("content-type"), Some(APPLICATION_JSON));
        }
    }

    #[test]
    fn get_moves_payload_into_query() {
        let request = builder()
            .build(
                "records/",
                Method::Get,
                &payload(json!({"asset_id": 3, "category": "food & drink", "id": [1, 2]})),
                None,
            )
            .unwrap();
        assert!(request.body.is_none());
        assert_eq!(
            request.url.as_str(),
            "http://api.test/records/?asset_id=3&category=food+%26+drink&id=1&id=2"
        );
    }

    #[test]
    fn get_without_payload_has_no_query() {
        let request = builder()
            .build("token/", Method::Get, &Payload::new(), None)
            .unwrap();
        assert_eq!(request.url.as_str(), "http://api.test/token/");
        assert!(request.body.is_none());
    }

    #[test]
    fn other_methods_serialize_body() {
        let body = payload(json!({"name": "B", "amount": 3.5}));
        for method in [Method::Post, Method::Put, Method::Patch, Method::Delete] {
            let request = builder().build("groups/", method, &body, None).unwrap();
            assert_eq!(
                request.body.as_deref(),
                Some(serde_json::to_string(&body).unwrap().as_str())
            );
            assert_eq!(request.url.as_str(), "http://api.test/groups/");
        }
    }

    #[test]
    fn session_attaches_cookie_and_credentials() {
        let session = Session::from_token("abc");
        let request = builder()
            .build("groups/", Method::Get, &Payload::new(), Some(&session))
            .unwrap();
        assert_eq!(request.header(COOKIE), Some("token=abc"));
        assert_eq!(request.credentials, Credentials::Include);

        let anonymous = builder()
            .build("groups/", Method::Get, &Payload::new(), None)
            .unwrap();
        assert_eq!(anonymous.header(COOKIE), None);
        assert_eq!(anonymous.credentials, Credentials::SameOrigin);
    }

    #[test]
    fn include_policy_applies_without_session() {
        let builder = builder().with_credentials(Credentials::Include);
        let login = builder
            .post("token/", &Payload::from_form([("username", "kim")]), None)
            .unwrap();
        assert_eq!(login.credentials, Credentials::Include);
        assert_eq!(login.header(COOKIE), None);

        // An HttpOnly token is invisible to the page's cookie jar.
        let session = Session::from_cookie_jar("theme=dark");
        let groups = builder
            .build("groups/", Method::Get, &Payload::new(), session.as_ref())
            .unwrap();
        assert_eq!(groups.credentials, Credentials::Include);
    }

    #[test]
    fn session_from_cookie_jar() {
        assert_eq!(
            Session::from_cookie_jar("theme=dark; token=xyz; lang=ko"),
            Some(Session::from_token("xyz"))
        );
        assert_eq!(Session::from_cookie_jar("theme=dark"), None);
        assert_eq!(Session::from_cookie_jar("token="), None);
        assert_eq!(Session::from_cookie_jar(""), None);
    }
}
