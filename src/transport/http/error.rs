use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every way a product request can fail, mapped to a status code.
///
/// Every variant answers with an empty body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("product not found")]
    NotFound,
    /// The comparison token equals the stored version.
    #[error("comparison token {0} matches the stored version")]
    VersionConflict(i32),
    #[error("missing or malformed comparison token header")]
    MissingToken,
    /// The body was not sent as JSON.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// The body is JSON but not a readable `Product`.
    #[error("unreadable JSON body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::VersionConflict(_) => StatusCode::CONFLICT,
            ApiError::MissingToken => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => {
                ApiError::UnsupportedMediaType(e.body_text())
            }
            other => ApiError::InvalidBody(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Internal(err) => {
                tracing::error!(error = %format!("{:#}", err), "request failed");
            }
            other => {
                tracing::debug!(error = %other, "request rejected");
            }
        }
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::VersionConflict(1).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UnsupportedMediaType("text/plain".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::InvalidBody("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn conflict_has_an_empty_body() {
        let response = ApiError::VersionConflict(1).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn invalid_body_has_an_empty_body() {
        let response = ApiError::InvalidBody("expected value".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
