/*!
 * API error type and HTTP status mapping.
 *
 * Every hardware-facing error is caught at the request boundary and
 * converted here into a status code and a small JSON error body; no device
 * error is allowed to crash the serving loop.
 */
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use redstrip_device::DeviceError;

/// Error type for API request handling
#[derive(Error, Debug)]
pub enum ApiError {
    /// The addressed resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// The request payload is malformed or carries an invalid value
    #[error("{0}")]
    InvalidArgument(String),

    /// The device is not connected or did not answer
    #[error("{0}")]
    DeviceUnavailable(String),

    /// The device failed to execute a command
    #[error("{0}")]
    CommandFailed(String),
}

impl ApiError {
    /// Create a not-found error
    pub fn not_found<S: AsRef<str>>(msg: S) -> Self {
        ApiError::NotFound(msg.as_ref().to_string())
    }

    /// Create an invalid-argument error
    pub fn invalid<S: AsRef<str>>(msg: S) -> Self {
        ApiError::InvalidArgument(msg.as_ref().to_string())
    }

    /// The HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::CommandFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DeviceError> for ApiError {
    fn from(e: DeviceError) -> Self {
        match e {
            DeviceError::OutOfRange { .. } => ApiError::NotFound("Outlet not found".to_string()),
            DeviceError::CommandRejected(_) | DeviceError::CommandFailed(_) => {
                ApiError::CommandFailed("Failed to control outlet power state".to_string())
            }
            DeviceError::NotFound
            | DeviceError::NotConnected
            | DeviceError::Communication(_)
            | DeviceError::Timeout
            | DeviceError::Protocol(_)
            | DeviceError::Io(_)
            | DeviceError::Json(_) => ApiError::DeviceUnavailable("Device not connected".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({"error": self.to_string()}));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::invalid("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::DeviceUnavailable("x".to_string()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::CommandFailed("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_device_error_conversion() {
        let e: ApiError = DeviceError::OutOfRange { index: 9, count: 6 }.into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);

        let e: ApiError = DeviceError::CommandRejected(-3).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let e: ApiError = DeviceError::Timeout.into();
        assert_eq!(e.status(), StatusCode::SERVICE_UNAVAILABLE);

        let e: ApiError = DeviceError::Communication("gone".to_string()).into();
        assert_eq!(e.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
