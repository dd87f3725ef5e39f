//! Network access to the backend API.
//!
//! Requests are built by `common::requests::RequestBuilder` and sent here with
//! `gloo-net`, one attempt each, with no timeout beyond the browser's own.
//! Every response body is decoded as JSON into a `common::responses::Envelope`.

use common::requests::{
    Credentials, Method, Payload, RequestBuilder, RequestDescriptor, RequestError, Session,
};
use common::responses::{Envelope, EnvelopeError, TableBody, TableEnvelope};
use gloo_net::http;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, RequestCredentials};

use crate::config::client_config;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] gloo_net::Error),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// The request builder for this client.
///
/// The backend issues its session cookie `HttpOnly`, so the page never sees
/// it. Every request is sent credentialed and the browser attaches the
/// cookie on its own.
pub fn request_builder() -> RequestBuilder {
    RequestBuilder::new(client_config()).with_credentials(Credentials::Include)
}

/// The session token from the page's cookies, if the browser exposes one.
/// `None` whenever the cookie is `HttpOnly`, which is the backend's default.
pub fn current_session() -> Option<Session> {
    let document = web_sys::window()?.document()?;
    let html_document = document.dyn_into::<HtmlDocument>().ok()?;
    let jar = html_document.cookie().ok()?;
    Session::from_cookie_jar(&jar)
}

/// Sends one request and decodes its body.
pub async fn send(descriptor: RequestDescriptor) -> Result<Envelope, ApiError> {
    gloo_console::log!(format!("{} {}", descriptor.method, descriptor.url));

    let mut builder = http::RequestBuilder::new(descriptor.url.as_str())
        .method(to_http_method(descriptor.method));
    for (name, value) in &descriptor.headers {
        builder = builder.header(name, value);
    }
    if descriptor.credentials == Credentials::Include {
        builder = builder.credentials(RequestCredentials::Include);
    }
    let request = match descriptor.body {
        Some(body) => builder.body(body)?,
        None => builder.build()?,
    };

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let envelope = Envelope::decode(status, &text)?;
    if !envelope.ok {
        gloo_console::warn!(format!(
            "{} {} answered {}",
            descriptor.method, descriptor.url, status
        ));
    }
    Ok(envelope)
}

/// Builds and sends a request with the current session attached.
pub async fn request(route: &str, method: Method, payload: Payload) -> Result<Envelope, ApiError> {
    let session = current_session();
    let descriptor = request_builder().build(route, method, &payload, session.as_ref())?;
    send(descriptor).await
}

/// Sends every named field of a submitted form verbatim.
pub async fn send_form(
    route: &str,
    method: Method,
    fields: Vec<(String, String)>,
) -> Result<Envelope, ApiError> {
    request(route, method, Payload::from_form(fields)).await
}

/// Loads a table with `GET route` and validates its shape.
pub async fn fetch_table(route: &str) -> Result<TableEnvelope, ApiError> {
    let envelope = request(route, Method::Get, Payload::new()).await?.into_table();
    if let TableBody::Invalid(err) = &envelope.body {
        gloo_console::error!(format!("{route}: malformed table payload: {err}"));
    }
    Ok(envelope)
}

fn to_http_method(method: Method) -> http::Method {
    match method {
        Method::Get => http::Method::GET,
        Method::Post => http::Method::POST,
        Method::Put => http::Method::PUT,
        Method::Patch => http::Method::PATCH,
        Method::Delete => http::Method::DELETE,
    }
}
