use crate::error::RpcError;
use serde::Serialize;
use serde_json::Value as Json;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON-RPC endpoint path of the object service.
const RPC_PATH: &str = "/jsonrpc";

/// Characters of a non-JSON body kept for error messages.
const PREVIEW_CHARS: usize = 300;

///
/// Transport
///
/// Blocking JSON-RPC 2.0 transport bound to one service base URL. One
/// request per call, no retries; retry policy belongs to callers that know
/// whether a call is idempotent.
///

pub struct Transport {
    base_url: String,
    http: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
    id: u64,
}

#[derive(Serialize)]
struct RpcParams<'a> {
    service: &'a str,
    method: &'a str,
    args: &'a [Json],
}

impl Transport {
    pub fn new(base_url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            base_url: normalize_url(base_url)?,
            http: reqwest::blocking::Client::new(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one JSON-RPC call and return its `result` payload.
    pub(crate) fn call(
        &self,
        service: &str,
        method: &str,
        args: Vec<Json>,
    ) -> Result<Json, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "call",
            params: RpcParams {
                service,
                method,
                args: &args,
            },
            id: next_request_id(),
        };

        let response = self
            .http
            .post(format!("{}{RPC_PATH}", self.base_url))
            .json(&request)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        let body: Option<Json> = serde_json::from_str(&text).ok();

        if status.is_client_error() || status.is_server_error() {
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| preview(&text));
            return Err(RpcError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let Some(body) = body else {
            return Err(RpcError::Decode {
                message: preview(&text),
            });
        };
        if let Some(message) = error_message(&body) {
            return Err(RpcError::Service { message });
        }
        Ok(body.get("result").cloned().unwrap_or(Json::Null))
    }
}

/// Prefer the server's detailed error message, fall back to the generic one.
pub(crate) fn error_message(body: &Json) -> Option<String> {
    let error = body.get("error")?;
    error
        .pointer("/data/message")
        .or_else(|| error.get("message"))
        .and_then(Json::as_str)
        .map(str::to_string)
        .or_else(|| Some(error.to_string()))
}

pub(crate) fn normalize_url(url: &str) -> Result<String, RpcError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(RpcError::InvalidUrl {
            url: url.to_string(),
            reason: "must start with http:// or https://".to_string(),
        })
    }
}

fn preview(text: &str) -> String {
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    if cut.is_empty() {
        "empty response body".to_string()
    } else {
        cut
    }
}

fn next_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
