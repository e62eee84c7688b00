use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        malformed_response_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn catalog_not_ready_error() -> Error {
    Error {
        code: 102,
        message: "catalog not loaded".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn config_error(message: &str) -> Error {
    Error {
        code: 2,
        message: format!("configuration error: {}", message),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return timeout_error();
    }

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn upstream_message_error(message: String) -> Error {
    Error { code: 4, message }
}

pub fn malformed_response_error<T: Debug>(_: T) -> Error {
    Error {
        code: 5,
        message: "malformed upstream response".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 8,
        message: "unexpected error".into(),
    }
}

pub fn timeout_error() -> Error {
    Error {
        code: 6,
        message: "upstream timeout".into(),
    }
}

pub fn bind_error<T: Debug>(err: T) -> Error {
    Error {
        code: 7,
        message: format!("could not bind listener: {:?}", err),
    }
}

#[test]
fn internal_errors_hide_message() {
    let response = upstream_message_error("secret detail".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = invalid_input_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
