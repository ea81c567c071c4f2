//! Coarse content-type classification for request and response bodies.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{CONTENT_TYPE, HeaderMap};

/// The body formats this crate knows how to produce or consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Json,
    Xml,
    Html,
    Text,
}

impl ContentType {
    /// Classifies a media type string by case-insensitive substring match.
    ///
    /// The order is `json`, `xml`, `html`; anything else is [`ContentType::Text`].
    /// This is a heuristic, so `application/vnd.api+json` is Json while
    /// `image/png` silently lands on Text.
    pub fn classify(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();
        if media_type.contains("json") {
            ContentType::Json
        } else if media_type.contains("xml") {
            ContentType::Xml
        } else if media_type.contains("html") {
            ContentType::Html
        } else {
            ContentType::Text
        }
    }

    /// Classifies the `Content-Type` of a header map.
    ///
    /// A missing or non-ASCII header classifies as Text.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::classify(media_type(headers).unwrap_or_default())
    }

    /// Media type used for outbound bodies of this kind.
    ///
    /// Only JSON gets its own media type; every other kind is sent as XML.
    pub fn outbound_media_type(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            _ => "application/xml",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentType::Json => "json",
            ContentType::Xml => "xml",
            ContentType::Html => "html",
            ContentType::Text => "text",
        };
        f.write_str(name)
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ContentType::Json),
            "xml" => Ok(ContentType::Xml),
            "html" => Ok(ContentType::Html),
            "text" => Ok(ContentType::Text),
            other => anyhow::bail!(
                "Unknown content type '{}'. Expected one of: json, xml, html, text.",
                other
            ),
        }
    }
}

/// Returns the media type of the `Content-Type` header, without parameters.
pub(crate) fn media_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or_default().trim())
}
