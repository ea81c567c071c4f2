//! Request description and the pieces assembled from it: URL, headers, body.

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use super::content_type::ContentType;

/// Credentials for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Basic <base64("username:password")>`
    pub fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"*********")
            .finish()
    }
}

/// Outbound request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    None,
    /// A pre-built payload, sent as-is with an optional media type.
    Raw {
        bytes: Vec<u8>,
        media_type: Option<String>,
    },
    /// Text sent as UTF-8 JSON or XML depending on `content_type`.
    /// Empty text means no body at all.
    Text {
        content: String,
        content_type: ContentType,
    },
}

impl Body {
    pub fn json(content: impl Into<String>) -> Self {
        Body::Text {
            content: content.into(),
            content_type: ContentType::Json,
        }
    }

    pub fn xml(content: impl Into<String>) -> Self {
        Body::Text {
            content: content.into(),
            content_type: ContentType::Xml,
        }
    }

    /// Resolves the body into bytes and the `Content-Type` to send with them.
    pub(crate) fn into_payload(self) -> Option<(Vec<u8>, Option<String>)> {
        match self {
            Body::None => None,
            Body::Raw { bytes, media_type } => Some((bytes, media_type)),
            Body::Text { content, .. } if content.is_empty() => None,
            Body::Text {
                content,
                content_type,
            } => Some((
                content.into_bytes(),
                Some(format!(
                    "{}; charset=utf-8",
                    content_type.outbound_media_type()
                )),
            )),
        }
    }
}

/// Everything needed to issue one request.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub body: Body,
    pub query: Vec<(String, String)>,
    pub auth: Option<BasicAuth>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: Body::None,
            query: Vec::new(),
            auth: None,
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Sets a query parameter. Setting an existing key replaces its value in place.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth::new(username, password));
        self
    }

    /// Adds a header; repeated names are all sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The URL with the query string appended.
    pub fn full_url(&self) -> String {
        build_url(&self.url, &self.query)
    }

    /// Header set for the per-call client: caller headers, then basic auth.
    pub fn header_map(&self) -> Result<HeaderMap> {
        build_headers(&self.headers, self.auth.as_ref())
    }
}

/// Appends `?k=v&k2=v2` to `base` when `query` is non-empty.
///
/// Keys and values are percent-encoded independently; everything outside the
/// RFC 3986 unreserved set is escaped, so a space becomes `%20`.
pub fn build_url<K, V>(base: &str, query: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if query.is_empty() {
        return base.to_string();
    }

    let query_string = query
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query_string)
}

/// Builds the header map for a request.
///
/// Basic auth replaces any `Authorization` header given in `headers`.
pub fn build_headers(headers: &[(String, String)], auth: Option<&BasicAuth>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name '{}'", name))?;
        let header_value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header '{}'", name))?;
        map.append(header_name, header_value);
    }

    if let Some(auth) = auth {
        let mut auth_value = HeaderValue::from_str(&auth.header_value())
            .context("Invalid basic auth credentials")?;
        auth_value.set_sensitive(true);
        map.insert(AUTHORIZATION, auth_value);
    }

    Ok(map)
}
