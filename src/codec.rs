//! JSON and XML conversions between strings and model types.
//!
//! Every function here is total: malformed input or a model that cannot be
//! represented in the target format comes back as a [`CodecError`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// JSON serialization settings.
///
/// Installed once through [`crate::registration::Registration`] and then shared
/// read-only by every request made through the built client. Decoding is not
/// affected by these settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonConfig {
    /// Emit indented, multi-line JSON.
    pub pretty: bool,
    /// Spaces per indentation level when `pretty` is set; 0 means the
    /// serde_json default of two.
    pub indent: usize,
}

impl JsonConfig {
    /// Pretty-printed output with `indent` spaces per level.
    pub fn indented(indent: usize) -> Self {
        Self {
            pretty: true,
            indent,
        }
    }
}

/// Errors from encoding or decoding a model.
#[derive(Debug)]
pub enum CodecError {
    JsonEncode(String),
    JsonDecode(String),
    XmlEncode(String),
    XmlDecode(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::JsonEncode(msg) => write!(f, "Failed to encode JSON: {}", msg),
            CodecError::JsonDecode(msg) => write!(f, "Failed to decode JSON: {}", msg),
            CodecError::XmlEncode(msg) => write!(f, "Failed to encode XML: {}", msg),
            CodecError::XmlDecode(msg) => write!(f, "Failed to decode XML: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

/// Serializes `model` to JSON using `config`.
pub fn to_json<T: Serialize + ?Sized>(model: &T, config: &JsonConfig) -> Result<String, CodecError> {
    if !config.pretty {
        return serde_json::to_string(model).map_err(|e| CodecError::JsonEncode(e.to_string()));
    }

    let indent = " ".repeat(if config.indent == 0 { 2 } else { config.indent });
    let mut out = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    model
        .serialize(&mut serializer)
        .map_err(|e| CodecError::JsonEncode(e.to_string()))?;

    String::from_utf8(out).map_err(|e| CodecError::JsonEncode(e.to_string()))
}

/// Deserializes JSON text into `T`.
///
/// Decoding does not consult [`JsonConfig`]; it only shapes output.
pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::JsonDecode(e.to_string()))
}

/// Serializes `model` to XML; the root element is named after the type.
pub fn to_xml<T: Serialize>(model: &T) -> Result<String, CodecError> {
    quick_xml::se::to_string(model).map_err(|e| CodecError::XmlEncode(e.to_string()))
}

/// Serializes `model` to XML under an explicit root element.
///
/// Needed for values without a type name of their own, such as maps.
pub fn to_xml_with_root<T: Serialize>(root: &str, model: &T) -> Result<String, CodecError> {
    quick_xml::se::to_string_with_root(root, model)
        .map_err(|e| CodecError::XmlEncode(e.to_string()))
}

/// Deserializes XML text into `T`. Field names map to child elements or attributes.
pub fn from_xml<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    quick_xml::de::from_str(text).map_err(|e| CodecError::XmlDecode(e.to_string()))
}
