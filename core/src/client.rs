//! Stateless HTTP request builder and response parser for the Momentum API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Whoever executes the round-trip (a `Transport`, a blocking host, a test)
//! sits in between, keeping this module deterministic and free of I/O.
//!
//! Two addressing modes exist. Every enveloped operation uses a path
//! relative to `base_url` and is marked `with_session`;
//! `build_get_current_weather` takes a caller-supplied absolute URL, never
//! touches the base host and never carries the session token.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::envelope::{ErrorBody, WebResponse};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Alarm, AlarmRequest, LoginRequest, RegisterRequest, Todo, TodoRequest, ToggleAlarmRequest,
    Transaction, TransactionRequest, User, Weather,
};

const OPENWEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Synchronous, stateless client for the Momentum API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- auth ---

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "api/users/register", input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<WebResponse<User>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "api/users/login", input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<WebResponse<User>, ApiError> {
        parse_envelope(response)
    }

    // --- finance ---

    pub fn build_create_transaction(
        &self,
        input: &TransactionRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "api/finance", input)
    }

    pub fn parse_create_transaction(
        &self,
        response: HttpResponse,
    ) -> Result<WebResponse<Transaction>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_get_transactions(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "api/finance")
    }

    pub fn parse_get_transactions(
        &self,
        response: HttpResponse,
    ) -> Result<WebResponse<Vec<Transaction>>, ApiError> {
        parse_envelope(response)
    }

    // --- todos ---

    pub fn build_get_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "api/todos")
    }

    pub fn parse_get_todos(&self, response: HttpResponse) -> Result<WebResponse<Vec<Todo>>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_create_todo(&self, input: &TodoRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "api/todos", input)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<WebResponse<Todo>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_toggle_todo(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = validate_id(id)?;
        Ok(self.request(HttpMethod::Patch, &format!("api/todos/{id}/toggle")))
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<WebResponse<Todo>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_delete_todo(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = validate_id(id)?;
        Ok(self.request(HttpMethod::Delete, &format!("api/todos/{id}")))
    }

    pub fn parse_delete_todo(
        &self,
        response: HttpResponse,
    ) -> Result<WebResponse<serde_json::Value>, ApiError> {
        parse_envelope(response)
    }

    // --- alarms ---

    pub fn build_get_alarms(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "api/alarms")
    }

    pub fn parse_get_alarms(&self, response: HttpResponse) -> Result<WebResponse<Vec<Alarm>>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_create_alarm(&self, input: &AlarmRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "api/alarms", input)
    }

    pub fn parse_create_alarm(&self, response: HttpResponse) -> Result<WebResponse<Alarm>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_toggle_alarm(
        &self,
        id: &str,
        input: &ToggleAlarmRequest,
    ) -> Result<HttpRequest, ApiError> {
        let id = validate_id(id)?;
        self.json_request(HttpMethod::Patch, &format!("api/alarms/{id}/toggle"), input)
    }

    pub fn parse_toggle_alarm(&self, response: HttpResponse) -> Result<WebResponse<Alarm>, ApiError> {
        parse_envelope(response)
    }

    pub fn build_delete_alarm(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = validate_id(id)?;
        Ok(self.request(HttpMethod::Delete, &format!("api/alarms/{id}")))
    }

    pub fn parse_delete_alarm(
        &self,
        response: HttpResponse,
    ) -> Result<WebResponse<serde_json::Value>, ApiError> {
        parse_envelope(response)
    }

    // --- weather (absolute URL, no envelope) ---

    pub fn build_get_current_weather(&self, url: &str) -> Result<HttpRequest, ApiError> {
        let parsed = Url::parse(url)
            .map_err(|e| ApiError::InvalidInput(format!("weather url {url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidInput(format!(
                "weather url must be http(s), got {}",
                parsed.scheme()
            )));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: parsed.into(),
            headers: Vec::new(),
            body: None,
            with_session: false,
        })
    }

    pub fn parse_get_current_weather(&self, response: HttpResponse) -> Result<Weather, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: Vec::new(),
            body: None,
            with_session: true,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            with_session: true,
        })
    }
}

/// Query parameters for the OpenWeatherMap current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
    pub api_key: String,
}

impl WeatherQuery {
    /// Absolute URL for `ApiClient::build_get_current_weather`, metric units.
    pub fn to_url(&self) -> Result<String, ApiError> {
        let url = Url::parse_with_params(
            OPENWEATHER_ENDPOINT,
            &[
                ("lat", self.lat.to_string()),
                ("lon", self.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        Ok(url.into())
    }
}

fn validate_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() {
        return Err(ApiError::InvalidInput("path id must not be empty".to_string()));
    }
    // URL parsing treats `\` as `/` and resolves `.`, `..` and their
    // percent-encoded forms, any of which would move the request elsewhere.
    let dot_segment = matches!(id, "." | "..");
    if dot_segment
        || id.contains(['/', '\\', '?', '#', '%'])
        || id.chars().any(char::is_whitespace)
    {
        return Err(ApiError::InvalidInput(format!("path id {id:?} is not a single segment")));
    }
    Ok(id)
}

fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<WebResponse<T>, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant, pulling
/// the server's `message` out of the body when it sent one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("request failed: {}", response.status));
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Business {
        status: response.status,
        message,
    })
}
