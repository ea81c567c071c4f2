//! Convenience layer over reqwest: assemble a request with query parameters,
//! headers and basic auth, send it, and optionally decode the body as JSON or
//! XML into a model type.

pub mod codec;
pub mod config;
pub mod http;
pub mod registration;

pub use codec::{CodecError, JsonConfig};
pub use config::ClientSettings;
pub use http::{
    BasicAuth, Body, ClientResponse, ContentType, HttpClientHelper, Method, Request, StatusCode,
    generate_model, generate_model_with_hint,
};
pub use registration::{Registration, register};
