use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors returned by the ExApp request handlers
#[derive(Debug, Error)]
pub enum AppError {
    /// The AppAPI headers are missing or malformed
    #[error("invalid AppAPI request context: {0}")]
    Context(&'static str),

    #[error("{action} failed: {source}")]
    Upstream {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse search results: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The WebDAV search did not return the requested field
    #[error("search result has no {0}")]
    NotFound(&'static str),

    #[error("failed to load workbook: {0}")]
    Import(String),

    #[error(transparent)]
    Method(#[from] axum::http::method::InvalidMethod),
}

impl AppError {
    pub fn upstream(action: &'static str) -> impl FnOnce(reqwest::Error) -> AppError {
        move |source| AppError::Upstream { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Context(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. }
            | AppError::Xml(_)
            | AppError::Import(_)
            | AppError::Method(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("{self}");
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::Context("missing ex-app-id").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("href").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Import("bad zip".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn xml_errors_are_server_errors() {
        let err: AppError = roxmltree::Document::parse("<open>").unwrap_err().into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
