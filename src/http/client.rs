//! Request pipeline: assemble, dispatch, wrap the outcome, optionally decode it.

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::factory::ClientFactory;
use super::model::generate_model_with_hint;
use super::request::{Body, Request};
use super::response::ClientResponse;
use crate::codec::{self, CodecError, JsonConfig};

/// Sends requests and wraps every outcome in a [`ClientResponse`].
///
/// None of the `send*` methods return an error: transport failures become a
/// response with an error message, decode failures become `None`.
#[derive(Debug, Clone, Default)]
pub struct HttpClientHelper {
    factory: ClientFactory,
    json: JsonConfig,
}

impl HttpClientHelper {
    /// Usually obtained from [`crate::registration::register`].
    pub fn new(factory: ClientFactory, json: JsonConfig) -> Self {
        Self { factory, json }
    }

    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    pub fn json_config(&self) -> &JsonConfig {
        &self.json
    }

    /// Encodes `model` as a JSON body using this helper's JSON settings.
    pub fn json_body<T: Serialize>(&self, model: &T) -> Result<Body, CodecError> {
        codec::to_json(model, &self.json).map(Body::json)
    }

    /// Encodes `model` as an XML body.
    pub fn xml_body<T: Serialize>(&self, model: &T) -> Result<Body, CodecError> {
        codec::to_xml(model).map(Body::xml)
    }

    /// Sends `request`, suspending until the response body is fully read.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, request: Request) -> ClientResponse {
        match self.try_send(request).await {
            Ok(response) => response,
            Err(e) => transport_failure(e),
        }
    }

    /// Sends `request`, blocking the current thread until the response body is fully read.
    ///
    /// Inside an async runtime the request runs on a scoped thread, since
    /// reqwest's blocking client cannot start or drop its runtime there.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub fn send_blocking(&self, request: Request) -> ClientResponse {
        let result = if tokio::runtime::Handle::try_current().is_ok() {
            debug!("Called from an async runtime, sending on a separate thread");
            std::thread::scope(|scope| {
                scope
                    .spawn(|| self.try_send_blocking(request))
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("Blocking request thread panicked")))
            })
        } else {
            self.try_send_blocking(request)
        };

        match result {
            Ok(response) => response,
            Err(e) => transport_failure(e),
        }
    }

    /// Sends `request` and decodes the body as the type its `Content-Type` names.
    pub async fn send_as<T>(&self, request: Request) -> Option<T>
    where
        T: DeserializeOwned + 'static,
    {
        let response = self.send(request).await;
        decode(&response)
    }

    /// Blocking counterpart of [`HttpClientHelper::send_as`].
    pub fn send_as_blocking<T>(&self, request: Request) -> Option<T>
    where
        T: DeserializeOwned + 'static,
    {
        let response = self.send_blocking(request);
        decode(&response)
    }

    async fn try_send(&self, request: Request) -> Result<ClientResponse> {
        let url = request.full_url();
        debug!("{} {}...", request.method, url);

        let mut headers = request.header_map()?;
        let payload = take_payload(request.body, &mut headers)?;

        let client = self.factory.build()?;
        let mut builder = client.request(request.method, &url).headers(headers);
        if let Some(bytes) = payload {
            builder = builder.body(bytes);
        }

        let response = builder.send().await.context("Failed to send request")?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(ClientResponse::new(status, headers, body))
    }

    fn try_send_blocking(&self, request: Request) -> Result<ClientResponse> {
        let url = request.full_url();
        debug!("{} {} (blocking)...", request.method, url);

        let mut headers = request.header_map()?;
        let payload = take_payload(request.body, &mut headers)?;

        let client = self.factory.build_blocking()?;
        let mut builder = client.request(request.method, &url).headers(headers);
        if let Some(bytes) = payload {
            builder = builder.body(bytes);
        }

        let response = builder.send().context("Failed to send request")?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().context("Failed to read response body")?;

        debug!("{} -> {} ({} bytes)", url, status, body.len());
        Ok(ClientResponse::new(status, headers, body))
    }
}

/// Resolves the body; its media type replaces any caller-supplied `Content-Type`.
fn take_payload(body: Body, headers: &mut HeaderMap) -> Result<Option<Vec<u8>>> {
    let Some((bytes, media_type)) = body.into_payload() else {
        return Ok(None);
    };

    if let Some(media_type) = media_type {
        let value = HeaderValue::from_str(&media_type)
            .with_context(|| format!("Invalid media type '{}'", media_type))?;
        headers.insert(CONTENT_TYPE, value);
    }

    Ok(Some(bytes))
}

fn transport_failure(error: anyhow::Error) -> ClientResponse {
    // {:#} keeps the whole context chain, e.g. "Failed to send request: error sending request ..."
    let message = format!("{:#}", error);
    warn!("Request failed: {}", message);
    ClientResponse::transport_failure(message)
}

fn decode<T>(response: &ClientResponse) -> Option<T>
where
    T: DeserializeOwned + 'static,
{
    let hint = response.content_type()?;
    generate_model_with_hint(response, hint)
}
