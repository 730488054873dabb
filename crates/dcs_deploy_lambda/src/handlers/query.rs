use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_MODE: &str = "default";

/// API Gateway proxy response returned by deployed handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlerResponse {
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn local() -> Self {
        Self {
            request_id: "local".to_string(),
        }
    }
}

pub fn query_data() -> Value {
    json!([{ "data": 123 }])
}

pub fn format_data(result: Value) -> Value {
    result
}

/// Placeholder handler: runs the fixed query and wraps it in a 200 response.
/// `mode` only changes what gets logged.
pub fn lambda_handler(
    _event: &Value,
    context: &InvocationContext,
    mode: Option<&str>,
) -> HandlerResponse {
    let mode = mode.unwrap_or(DEFAULT_MODE);
    tracing::info!(request_id = %context.request_id, mode, "handling query");

    let result = query_data();
    let body = format_data(result);

    HandlerResponse {
        is_base64_encoded: true,
        status_code: 200,
        headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
        body,
    }
}
