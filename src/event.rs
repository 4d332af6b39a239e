//! Trigger event model
//!
//! The handler speaks a gateway-style event protocol: a request descriptor
//! with the HTTP method, query parameters and a raw body string, and a
//! response descriptor with status code, headers and a JSON body string.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, warn};

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const CONTENT_TYPE: &str = "Content-Type";

const PREFLIGHT_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_HEADERS: &str = "Content-Type, X-User-Id, X-Auth-Token";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Incoming request descriptor
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl ContentRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            query_string_parameters: None,
            body: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert("entity".to_string(), entity.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Raw `entity` selector, empty when absent
    pub fn entity(&self) -> &str {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get("entity"))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Outgoing response descriptor
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ContentResponse {
    /// JSON response carrying the permissive origin header
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Self {
        let (status, body) = match serde_json::to_string(payload) {
            Ok(body) => (status, body),
            Err(e) => {
                error!("Failed to encode response body: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"error":"Failed to encode response","code":"INTERNAL_ERROR"}"#.to_string(),
                )
            }
        };

        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// CORS preflight answer; never touches the database
    pub fn preflight() -> Self {
        let headers = [
            (ALLOW_ORIGIN, "*"),
            (ALLOW_METHODS, PREFLIGHT_METHODS),
            (ALLOW_HEADERS, PREFLIGHT_HEADERS),
            (MAX_AGE, PREFLIGHT_MAX_AGE),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

impl IntoResponse for ContentResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Dropping invalid response header: {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_deserializes_trigger_shape() {
        let raw = r#"{
            "httpMethod": "POST",
            "queryStringParameters": {"entity": "news"},
            "body": "{\"title\":\"X\"}"
        }"#;
        let request: ContentRequest = serde_json::from_str(raw).unwrap();

        assert_eq!(request.http_method, "POST");
        assert_eq!(request.entity(), "news");
        assert_eq!(request.body.as_deref(), Some(r#"{"title":"X"}"#));
    }

    #[test]
    fn test_request_defaults() {
        let request: ContentRequest =
            serde_json::from_str(r#"{"queryStringParameters": null}"#).unwrap();

        assert_eq!(request.http_method, "GET");
        assert_eq!(request.entity(), "");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_preflight_headers() {
        let response = ContentResponse::preflight();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "");
        assert_eq!(response.header(ALLOW_ORIGIN), Some("*"));
        assert_eq!(response.header(ALLOW_METHODS), Some(PREFLIGHT_METHODS));
        assert_eq!(response.header(ALLOW_HEADERS), Some(PREFLIGHT_HEADERS));
        assert_eq!(response.header(MAX_AGE), Some("86400"));
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = ContentResponse::json(StatusCode::CREATED, &serde_json::json!({"id": 1}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["body"], r#"{"id":1}"#);
        assert_eq!(value["headers"][ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_into_http_response() {
        let response = ContentResponse::preflight().into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-max-age").unwrap(),
            "86400"
        );
    }
}
