//! Request builder, response parser and access layer for the registry.
//!
//! # Design
//! `PersonasClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the host executes the round-trip in between.
//!
//! `get`, `create` and `update` are the blocking pass-through form of the
//! same calls: they take a full URL, run the request through a `Transport`
//! and return whatever error the transport or the server produced.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::Persona;

/// Address of the registry endpoint when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/personas";

/// Stateless client for the registry endpoint.
#[derive(Debug, Clone)]
pub struct PersonasClient {
    base_url: String,
}

impl Default for PersonasClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PersonasClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_page(&self, page: u32, page_size: u32) -> HttpRequest {
        HttpRequest::get(format!(
            "{}?page={page}&pageSize={page_size}",
            self.base_url
        ))
    }

    pub fn build_create(&self, persona: &Persona) -> Result<HttpRequest, ApiError> {
        HttpRequest::json(HttpMethod::Post, self.base_url.as_str(), persona)
    }

    pub fn build_update(&self, persona: &Persona) -> Result<HttpRequest, ApiError> {
        HttpRequest::json(HttpMethod::Put, self.base_url.as_str(), persona)
    }

    pub fn parse_list_page(&self, response: HttpResponse) -> Result<Vec<Persona>, ApiError> {
        parse_records(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Persona, ApiError> {
        parse_record(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Persona, ApiError> {
        parse_record(response)
    }
}

/// Fetch the records at `url`.
pub fn get<T: Transport>(transport: &mut T, url: &str) -> Result<Vec<Persona>, ApiError> {
    parse_records(transport.execute(HttpRequest::get(url))?)
}

/// `POST` a new record to `url`.
pub fn create<T: Transport>(
    transport: &mut T,
    url: &str,
    persona: &Persona,
) -> Result<Persona, ApiError> {
    let request = HttpRequest::json(HttpMethod::Post, url, persona)?;
    parse_record(transport.execute(request)?)
}

/// `PUT` a full record to `url`.
pub fn update<T: Transport>(
    transport: &mut T,
    url: &str,
    persona: &Persona,
) -> Result<Persona, ApiError> {
    let request = HttpRequest::json(HttpMethod::Put, url, persona)?;
    parse_record(transport.execute(request)?)
}

fn parse_records(response: HttpResponse) -> Result<Vec<Persona>, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn parse_record(response: HttpResponse) -> Result<Persona, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
