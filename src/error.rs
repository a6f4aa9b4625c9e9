use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

/// Application error types
///
/// Every variant except `PayloadTooLarge` is reported to the client as
/// `422 Unprocessable Entity`; the variant decides the `body` kind string.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Unknown template token '{0}'")]
    Template(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    InvalidPayload { kind: &'static str, message: String },

    #[error("{0}")]
    PayloadTooLarge(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        AppError::Generation(msg.into())
    }

    /// Short name of the failure, reported in the `body` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::Template(_) => "TemplateError",
            AppError::Generation(_) => "GenerationError",
            AppError::Io(_) => "IoError",
            AppError::InvalidPayload { kind, .. } => kind,
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Error payload returned with every 422 response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable error message
    pub detail: String,
    /// Error kind
    pub body: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = self.status();
        let detail = self.to_string();
        warn!(kind, detail = %detail, "Request failed");

        let body = Json(ErrorBody {
            detail,
            body: kind.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Bodies without Content-Length only hit the size limit while buffering.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(rejection.body_text());
        }
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "JsonDataError",
            JsonRejection::JsonSyntaxError(_) => "JsonSyntaxError",
            JsonRejection::MissingJsonContentType(_) => "MissingJsonContentType",
            JsonRejection::BytesRejection(_) => "BytesRejection",
            _ => "JsonRejection",
        };
        AppError::InvalidPayload {
            kind,
            message: rejection.body_text(),
        }
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Generation(format!("zip: {}", err))
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Generation(format!("image: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Generation(format!("csv: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Generation(format!("json: {}", err))
    }
}

/// JSON body extractor whose rejections go through [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_every_error_is_unprocessable() {
        let errors = vec![
            AppError::validation("bad size"),
            AppError::Template("nope".to_string()),
            AppError::generation("boom"),
            AppError::Io(std::io::Error::other("disk")),
        ];

        for err in errors {
            let kind = err.kind();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

            let body = response.into_body().collect().await.unwrap().to_bytes();
            let parsed: ErrorBody = serde_json::from_slice(&body).unwrap();
            assert_eq!(parsed.body, kind);
            assert!(!parsed.detail.is_empty());
        }
    }

    #[tokio::test]
    async fn test_payload_too_large_keeps_error_shape() {
        let response = AppError::PayloadTooLarge("length limit exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.body, "PayloadTooLarge");
    }

    #[test]
    fn test_template_error_message() {
        let err = AppError::Template("unicorn".to_string());
        assert_eq!(err.to_string(), "Unknown template token 'unicorn'");
        assert_eq!(err.kind(), "TemplateError");
    }
}
