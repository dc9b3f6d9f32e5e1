use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::CommerceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Request timeout")]
    Timeout,

    #[error("{0}")]
    NotConfigured(String),

    /// The upstream service failed; the message names what could not be
    /// fetched.
    #[error("{0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a failed upstream call. Deadline expiry keeps its own status so
    /// callers can tell a slow backend from a broken one.
    pub fn upstream(err: CommerceError, what: &str) -> Self {
        match err {
            CommerceError::Timeout => AppError::Timeout,
            other => {
                log::error!("Error fetching {}: {}", what, other);
                AppError::Upstream(format!("Failed to fetch {what}"))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Timeout => HttpResponse::GatewayTimeout().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotConfigured(_) | AppError::Upstream(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("Query parameter is required".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeout_returns_504() {
        assert_eq!(
            AppError::Timeout.error_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn not_configured_and_upstream_return_500() {
        let not_configured = AppError::NotConfigured("HERE API key is not configured".to_string());
        let upstream = AppError::Upstream("Failed to fetch collections".to_string());
        assert_eq!(
            not_configured.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            upstream.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn internal_error_hides_detail() {
        let resp = AppError::Internal("pool exhausted".to_string()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({ "error": "Internal server error" })
        );
    }

    #[actix_web::test]
    async fn upstream_body_names_resource() {
        let resp = AppError::upstream(CommerceError::Transport { status: 502 }, "collections")
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({ "error": "Failed to fetch collections" })
        );
    }

    #[test]
    fn commerce_timeout_maps_to_timeout() {
        let err = AppError::upstream(CommerceError::Timeout, "collections");
        assert!(matches!(err, AppError::Timeout));
        assert_eq!(err.to_string(), "Request timeout");
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }
}
