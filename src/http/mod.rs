//! HTTP request pipeline with content-type driven response decoding.

mod client;
mod content_type;
mod factory;
mod model;
mod request;
mod response;

pub use client::HttpClientHelper;
pub use content_type::ContentType;
pub use factory::ClientFactory;
pub use model::{generate_model, generate_model_with_hint};
pub use request::{BasicAuth, Body, Request, build_headers, build_url};
pub use response::{ClientResponse, TRANSPORT_FAILURE_STATUS};

pub use reqwest::{Method, StatusCode};
