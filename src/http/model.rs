//! Turning a response body into a caller-chosen model type.

use log::debug;
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId};

use super::content_type::ContentType;
use super::response::ClientResponse;
use crate::codec;

/// Decodes the body without a content-type hint.
///
/// Tries JSON, then XML, then hands back the raw body when `T` is `String`.
/// Returns `None` for unsuccessful responses, empty bodies, or when nothing fits.
///
/// A `String` target never goes through the XML decoder: quick-xml reads any
/// text as a string and would return it trimmed and entity-decoded.
pub fn generate_model<T>(response: &ClientResponse) -> Option<T>
where
    T: DeserializeOwned + 'static,
{
    let body = decodable_body(response)?;

    match codec::from_json(body) {
        Ok(model) => return Some(model),
        Err(e) => debug!("{}", e),
    }

    if !is_string::<T>() {
        match codec::from_xml(body) {
            Ok(model) => return Some(model),
            Err(e) => debug!("{}", e),
        }
    }

    raw_body(body)
}

/// Decodes the body with the decoder named by `hint` only.
///
/// Json and Xml select their decoder; Html and Text select none. When decoding
/// fails the raw body is returned if `T` is `String`. The other format is never tried.
/// As in [`generate_model`], a `String` target skips the XML decoder.
pub fn generate_model_with_hint<T>(response: &ClientResponse, hint: ContentType) -> Option<T>
where
    T: DeserializeOwned + 'static,
{
    let body = decodable_body(response)?;

    let decoded = match hint {
        ContentType::Json => codec::from_json(body).map(Some),
        ContentType::Xml if is_string::<T>() => Ok(None),
        ContentType::Xml => codec::from_xml(body).map(Some),
        ContentType::Html | ContentType::Text => Ok(None),
    };

    match decoded {
        Ok(Some(model)) => Some(model),
        Ok(None) => raw_body(body),
        Err(e) => {
            debug!("{}", e);
            raw_body(body)
        }
    }
}

fn decodable_body(response: &ClientResponse) -> Option<&str> {
    if !response.is_success() || response.body().is_empty() {
        return None;
    }
    Some(response.body())
}

fn is_string<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<String>()
}

/// `Some(body)` when `T` is exactly `String`.
fn raw_body<T: 'static>(body: &str) -> Option<T> {
    let boxed: Box<dyn Any> = Box::new(body.to_string());
    boxed.downcast::<T>().ok().map(|model| *model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    fn ok_response(content_type: &'static str, body: &str) -> ClientResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        ClientResponse::new(StatusCode::OK, headers, body.to_string())
    }

    const JSON_ITEM: &str = r#"{"id": 1, "name": "widget"}"#;
    const XML_ITEM: &str = "<Item><id>1</id><name>widget</name></Item>";

    fn widget() -> Item {
        Item {
            id: 1,
            name: "widget".to_string(),
        }
    }

    #[test]
    fn test_no_hint_prefers_json() {
        let resp = ok_response("text/plain", JSON_ITEM);
        assert_eq!(generate_model::<Item>(&resp), Some(widget()));
    }

    #[test]
    fn test_no_hint_falls_back_to_xml() {
        // Header claims JSON, body is XML; the header is not consulted
        let resp = ok_response("application/json", XML_ITEM);
        assert_eq!(generate_model::<Item>(&resp), Some(widget()));
    }

    #[test]
    fn test_no_hint_nothing_fits() {
        let resp = ok_response("text/plain", "definitely not a model");
        assert_eq!(generate_model::<Item>(&resp), None);
    }

    #[test]
    fn test_unsuccessful_response_yields_nothing() {
        let resp = ClientResponse::new(StatusCode::BAD_REQUEST, HeaderMap::new(), JSON_ITEM.to_string());
        assert_eq!(generate_model::<Item>(&resp), None);
        assert_eq!(generate_model_with_hint::<Item>(&resp, ContentType::Json), None);
        assert_eq!(generate_model::<String>(&resp), None);
    }

    #[test]
    fn test_empty_body_yields_nothing() {
        let resp = ok_response("application/json", "");
        assert_eq!(generate_model::<Item>(&resp), None);
        assert_eq!(generate_model_with_hint::<String>(&resp, ContentType::Text), None);
    }

    #[test]
    fn test_transport_failure_yields_nothing() {
        let resp = ClientResponse::transport_failure("connection refused");
        assert_eq!(generate_model::<String>(&resp), None);
    }

    #[test]
    fn test_json_hint() {
        let resp = ok_response("application/json", JSON_ITEM);
        assert_eq!(
            generate_model_with_hint::<Item>(&resp, ContentType::Json),
            Some(widget())
        );
    }

    #[test]
    fn test_xml_hint() {
        let resp = ok_response("application/xml", XML_ITEM);
        assert_eq!(
            generate_model_with_hint::<Item>(&resp, ContentType::Xml),
            Some(widget())
        );
    }

    #[test]
    fn test_xml_hint_does_not_fall_back_to_json() {
        let resp = ok_response("application/xml", JSON_ITEM);
        assert_eq!(generate_model_with_hint::<Item>(&resp, ContentType::Xml), None);
    }

    #[test]
    fn test_json_hint_does_not_fall_back_to_xml() {
        let resp = ok_response("application/json", XML_ITEM);
        assert_eq!(generate_model_with_hint::<Item>(&resp, ContentType::Json), None);
    }

    #[test]
    fn test_text_hint_returns_raw_string() {
        let resp = ok_response("text/plain", "hello world");
        assert_eq!(
            generate_model_with_hint::<String>(&resp, ContentType::Text),
            Some("hello world".to_string())
        );
        assert_eq!(generate_model_with_hint::<Item>(&resp, ContentType::Text), None);
    }

    #[test]
    fn test_html_hint_skips_decoders() {
        let resp = ok_response("text/html", JSON_ITEM);
        assert_eq!(generate_model_with_hint::<Item>(&resp, ContentType::Html), None);
        assert_eq!(
            generate_model_with_hint::<String>(&resp, ContentType::Html),
            Some(JSON_ITEM.to_string())
        );
    }

    #[test]
    fn test_failed_json_hint_falls_back_to_raw_string() {
        let resp = ok_response("application/json", "not json");
        assert_eq!(
            generate_model_with_hint::<String>(&resp, ContentType::Json),
            Some("not json".to_string())
        );
    }

    #[test]
    fn test_json_string_literal_decodes_as_json() {
        let resp = ok_response("application/json", r#""quoted""#);
        assert_eq!(
            generate_model_with_hint::<String>(&resp, ContentType::Json),
            Some("quoted".to_string())
        );
    }

    #[test]
    fn test_no_hint_string_target_gets_body_untouched() {
        let body = "  hello &amp; world \n";
        let resp = ok_response("text/plain", body);
        assert_eq!(generate_model::<String>(&resp), Some(body.to_string()));
    }

    #[test]
    fn test_xml_hint_string_target_gets_body_untouched() {
        let body = "<note> fish &amp; chips </note>";
        let resp = ok_response("application/xml", body);
        assert_eq!(
            generate_model_with_hint::<String>(&resp, ContentType::Xml),
            Some(body.to_string())
        );
    }

    #[test]
    fn test_is_string() {
        assert!(is_string::<String>());
        assert!(!is_string::<Item>());
        assert!(!is_string::<&'static str>());
    }

    #[test]
    fn test_raw_body_only_for_string() {
        assert_eq!(raw_body::<String>("abc"), Some("abc".to_string()));
        assert_eq!(raw_body::<Vec<u8>>("abc"), None);
        assert_eq!(raw_body::<u32>("42"), None);
    }
}
