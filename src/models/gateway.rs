//! HTTP-shaped events exchanged with the API gateway.

use std::collections::{BTreeMap, HashMap};

use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD, Engine};
use http::{header::HeaderName, HeaderValue, Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::CorsConfig,
    error::{AppError, Result},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    /// Raw or base64 text from the gateway, or an already-parsed JSON value.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GatewayRequest {
    pub fn new(method: &Method, id: Option<String>, body: Option<String>) -> Self {
        Self {
            http_method: method.as_str().to_string(),
            path_parameters: id.map(|id| HashMap::from([("id".to_string(), id)])),
            body: body.map(Value::String),
            is_base64_encoded: false,
        }
    }

    /// Builds an event from a raw HTTP body.
    ///
    /// Bytes that are not UTF-8 travel base64-encoded, as the gateway sends binary payloads.
    pub fn from_http(method: &Method, id: Option<String>, body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::new(method, id, None);
        }

        match std::str::from_utf8(body) {
            Ok(text) => Self::new(method, id, Some(text.to_string())),
            Err(_) => Self {
                is_base64_encoded: true,
                ..Self::new(method, id, Some(STANDARD.encode(body)))
            },
        }
    }

    /// Decodes a raw gateway payload. A payload of the wrong shape is a validation failure.
    pub fn from_event(event: Value) -> Result<Self> {
        serde_json::from_value(event)
            .map_err(|e| AppError::BadRequest(format!("Malformed gateway event: {}", e)))
    }

    pub fn is_preflight(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("OPTIONS")
    }

    pub fn path_id(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get("id"))
            .map(|id| id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn require_path_id(&self) -> Result<&str> {
        self.path_id()
            .ok_or_else(|| AppError::BadRequest("Product ID is required".to_string()))
    }

    /// Decodes the body into a JSON object.
    ///
    /// A missing, undecodable or non-object body is a validation failure.
    pub fn json_object(&self) -> Result<Map<String, Value>> {
        let raw = match &self.body {
            Some(Value::String(raw)) if !raw.trim().is_empty() => raw,
            Some(Value::Object(map)) => return Ok(map.clone()),
            None | Some(Value::Null) | Some(Value::String(_)) => {
                return Err(AppError::BadRequest("Request body is empty".to_string()))
            }
            Some(_) => return Err(not_an_object()),
        };

        let decoded;
        let text = if self.is_base64_encoded {
            let bytes = STANDARD
                .decode(raw.trim())
                .map_err(|_| AppError::BadRequest("Request body is not valid base64".to_string()))?;
            decoded = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest("Request body is not valid UTF-8".to_string()))?;
            decoded.as_str()
        } else {
            raw.as_str()
        };

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(not_an_object()),
            Err(e) => Err(AppError::BadRequest(format!(
                "Request body is not valid JSON: {}",
                e
            ))),
        }
    }
}

fn not_an_object() -> AppError {
    AppError::BadRequest("Request body must be a JSON object".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);

        Self {
            status_code: status.as_u16(),
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self> {
        Ok(Self::new(status, serde_json::to_string(value)?))
    }

    pub fn preflight(cors: &CorsConfig, methods: &str) -> Self {
        let mut response = Self::new(StatusCode::OK, "{}".to_string());
        response.headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            cors.allowed_headers.clone(),
        );
        response
            .headers
            .insert("Access-Control-Allow-Methods".to_string(), methods.to_string());
        response.with_cors(cors)
    }

    pub fn with_cors(mut self, cors: &CorsConfig) -> Self {
        self.headers.insert(
            "Access-Control-Allow-Origin".to_string(),
            cors.allowed_origin.clone(),
        );
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    pub fn json_body(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_body(body: &str) -> GatewayRequest {
        GatewayRequest {
            http_method: "POST".to_string(),
            body: Some(Value::from(body)),
            ..Default::default()
        }
    }

    #[test]
    fn decodes_gateway_event_shape() {
        let event: GatewayRequest = serde_json::from_str(
            r#"{"httpMethod":"GET","pathParameters":{"id":"abc"},"body":null}"#,
        )
        .unwrap();

        assert_eq!(event.http_method, "GET");
        assert_eq!(event.path_id(), Some("abc"));
        assert!(event.body.is_none());
    }

    #[test]
    fn empty_path_id_counts_as_missing() {
        let event = GatewayRequest::new(&Method::GET, Some(String::new()), None);

        assert!(event.path_id().is_none());
        assert!(matches!(event.require_path_id(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_missing_and_non_object_bodies() {
        let missing = GatewayRequest::default();
        assert!(matches!(missing.json_object(), Err(AppError::BadRequest(_))));

        for body in ["not json", "null", "[1,2]", "42", "   "] {
            assert!(
                matches!(request_with_body(body).json_object(), Err(AppError::BadRequest(_))),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[test]
    fn decodes_base64_bodies() {
        let mut event = request_with_body(&STANDARD.encode(r#"{"name":"Widget"}"#));
        event.is_base64_encoded = true;

        let body = event.json_object().unwrap();
        assert_eq!(body.get("name"), Some(&Value::from("Widget")));

        event.body = Some(Value::from("%%%"));
        assert!(matches!(event.json_object(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn accepts_object_bodies_and_null_fields() {
        let event: GatewayRequest = serde_json::from_str(
            r#"{"httpMethod":null,"isBase64Encoded":null,"body":{"name":"Widget","price":9.99}}"#,
        )
        .unwrap();

        assert_eq!(event.http_method, "");
        assert!(!event.is_preflight());
        let body = event.json_object().unwrap();
        assert_eq!(body.get("name"), Some(&Value::from("Widget")));

        let array = GatewayRequest {
            body: Some(serde_json::json!([1, 2])),
            ..Default::default()
        };
        assert!(matches!(array.json_object(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn malformed_events_are_validation_errors() {
        let result = GatewayRequest::from_event(serde_json::json!({ "pathParameters": 5 }));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = GatewayRequest::from_event(serde_json::json!("not an event"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn binary_http_bodies_fail_as_invalid_utf8() {
        let event = GatewayRequest::from_http(&Method::POST, None, &[0xff, 0xfe, b'{']);
        assert!(event.is_base64_encoded);

        match event.json_object() {
            Err(AppError::BadRequest(message)) => assert_eq!(message, "Request body is not valid UTF-8"),
            other => panic!("unexpected result: {:?}", other),
        }

        let empty = GatewayRequest::from_http(&Method::POST, None, b"");
        assert!(empty.body.is_none());
    }

    #[test]
    fn preflight_lists_methods_and_headers() {
        let cors = CorsConfig::default();
        let response = GatewayResponse::preflight(&cors, "POST,OPTIONS");

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "{}");
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some("POST,OPTIONS"));
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.header("Access-Control-Allow-Headers").is_some());
    }

    #[test]
    fn serializes_response_in_gateway_casing() {
        let response = GatewayResponse::new(StatusCode::CREATED, "{}".to_string());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
    }
}
