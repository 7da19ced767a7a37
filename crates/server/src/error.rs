use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use docbrief_common::DocBriefError;
use std::fmt;

use crate::types::ErrorResponse;

/// HTTP face of a `DocBriefError`
#[derive(Debug)]
pub struct HttpError(pub DocBriefError);

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DocBriefError> for HttpError {
    fn from(err: DocBriefError) -> Self {
        Self(err)
    }
}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.0.to_string(),
        })
    }
}

/// Shorthand for a 400 with the given detail
pub fn bad_request<S: Into<String>>(detail: S) -> HttpError {
    HttpError(DocBriefError::validation(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use docbrief_common::ApiError;

    #[actix_web::test]
    async fn test_error_body_and_status() {
        let err = HttpError(DocBriefError::from(ApiError::RetriesExhausted { attempts: 3 }));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["detail"]
            .as_str()
            .unwrap()
            .contains("maximum retries exceeded"));
    }

    #[test]
    fn test_bad_request() {
        assert_eq!(bad_request("nope").status_code(), StatusCode::BAD_REQUEST);
    }
}
