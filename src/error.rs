//! Error types — the five standard JSON-RPC codes on the wire, plus the six
//! error kinds from the error-handling design (`import/config`, `validation`,
//! `connection`, `response`, `request`, `authentication`).

use crate::types::JsonRpcError;

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes — the only codes on the wire contract.
// ---------------------------------------------------------------------------

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Unified error type for the runtime: JSON-RPC framing errors plus the
/// six error kinds named in the error-handling design. Each kind maps onto
/// one of the five wire codes when it crosses the JSON-RPC boundary, but the
/// variant itself is what callers match on internally.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    /// Malformed JSON on the wire (code -32700).
    #[error("parse error: {message}")]
    ParseError {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// The JSON-RPC envelope itself is malformed (code -32600).
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// No handler for the requested method (code -32601).
    #[error("method not found: {message}")]
    MethodNotFound {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// Well-formed JSON-RPC, malformed params (code -32602). Also used for
    /// the `validation` error kind (§7): surfaced, never retried.
    #[error("invalid params: {message}")]
    InvalidParams {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// Everything else server-side (code -32603).
    #[error("internal error: {message}")]
    InternalError {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// Fatal at startup only — bad configuration, unreachable dependency at
    /// boot. Never surfaced at request time.
    #[error("configuration error: {0}")]
    Config(String),

    /// DNS/TCP/TLS/HTTP-transport failure. Carries the target URL so a
    /// caller can report or retry against it.
    #[error("connection error to {url}: {message}")]
    Connection { url: String, message: String },

    /// Valid transport, semantically wrong response: non-JSON body, a
    /// missing required field, an unrecognized task id.
    #[error("response error: {0}")]
    Response(String),

    /// Well-formed request rejected by the remote (HTTP 4xx other than
    /// auth failures).
    #[error("request rejected (status {status}): {message}")]
    Request { status: u16, message: String },

    /// HTTP 401/403 or an explicit auth failure, kept distinct from
    /// `Request` so callers can special-case it (e.g. prompt for a new
    /// token) rather than treating it as a generic rejection.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A request or stream timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// A JSON-RPC error response was received from the remote peer.
    #[error("remote error {code}: {message}")]
    JsonRpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
}

pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::MethodNotFound {
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            data: None,
        }
    }

    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self::Response(message.into())
    }

    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    /// Returns the JSON-RPC error code this error maps to on the wire.
    /// Only the five standard codes ever cross the wire (§4.2); kinds with
    /// no direct wire counterpart (`Config`, `Connection`, `Response`,
    /// `Request`, `Authentication`, `Timeout`) fall back to `internal`.
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError { .. } => PARSE_ERROR,
            A2AError::InvalidRequest { .. } => INVALID_REQUEST,
            A2AError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            A2AError::InvalidParams { .. } => INVALID_PARAMS,
            A2AError::JsonRpc { code, .. } => *code,
            A2AError::InternalError { .. }
            | A2AError::Config(_)
            | A2AError::Connection { .. }
            | A2AError::Response(_)
            | A2AError::Request { .. }
            | A2AError::Authentication(_)
            | A2AError::Timeout(_) => INTERNAL_ERROR,
        }
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        let code = err.code();
        let message = err.to_string();
        let data = match &err {
            A2AError::ParseError { data, .. }
            | A2AError::InvalidRequest { data, .. }
            | A2AError::MethodNotFound { data, .. }
            | A2AError::InvalidParams { data, .. }
            | A2AError::InternalError { data, .. }
            | A2AError::JsonRpc { data, .. } => data.clone(),
            _ => None,
        };
        JsonRpcError {
            code,
            message,
            data,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::ParseError {
            message: err.to_string(),
            data: None,
        }
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            if status.as_u16() == 401 || status.as_u16() == 403 {
                A2AError::Authentication(err.to_string())
            } else {
                A2AError::Request {
                    status: status.as_u16(),
                    message: err.to_string(),
                }
            }
        } else {
            A2AError::Connection {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_error_codes_are_standard_only() {
        assert_eq!(PARSE_ERROR, -32700);
        assert_eq!(INVALID_REQUEST, -32600);
        assert_eq!(METHOD_NOT_FOUND, -32601);
        assert_eq!(INVALID_PARAMS, -32602);
        assert_eq!(INTERNAL_ERROR, -32603);
    }

    #[test]
    fn non_wire_kinds_fall_back_to_internal() {
        assert_eq!(A2AError::Config("bad".into()).code(), INTERNAL_ERROR);
        assert_eq!(
            A2AError::connection("http://x", "refused").code(),
            INTERNAL_ERROR
        );
        assert_eq!(A2AError::response("missing field").code(), INTERNAL_ERROR);
        assert_eq!(A2AError::request(404, "not found").code(), INTERNAL_ERROR);
        assert_eq!(
            A2AError::Authentication("bad token".into()).code(),
            INTERNAL_ERROR
        );
    }

    #[test]
    fn json_rpc_error_preserves_remote_code() {
        let err = A2AError::JsonRpc {
            code: -32001,
            message: "task not found".to_string(),
            data: None,
        };
        assert_eq!(err.code(), -32001);
    }

    #[test]
    fn validation_maps_to_invalid_params() {
        let err = A2AError::validation("bad role");
        assert_eq!(err.code(), INVALID_PARAMS);
        let rpc_err: JsonRpcError = err.into();
        assert_eq!(rpc_err.code, INVALID_PARAMS);
    }

    #[test]
    fn connection_error_carries_url() {
        let err = A2AError::connection("http://example.invalid", "refused");
        assert!(err.to_string().contains("http://example.invalid"));
    }
}
