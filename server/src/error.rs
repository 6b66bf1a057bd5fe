use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    /// Injected transient failure on the pantry read path.
    #[error("Backend error")]
    Unavailable,

    /// Injected transient failure on the catalog search path.
    #[error("Backend timeout")]
    UpstreamTimeout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        };

        (status, self.to_string()).into_response()
    }
}
