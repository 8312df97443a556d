//! Conversion of domain errors into `{ code, msg }` JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::blog::BlogError;
use crate::search::{ErrorBody, SearchError};

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Logs a failure reaching a route boundary: error level from 500 up, warn below.
pub(super) fn log_error(code: u16, message: &str) {
    if code >= 500 {
        error!("Request failed with {}: {}", code, message);
    } else {
        warn!("Request rejected with {}: {}", code, message);
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let body = self.to_body();
        log_error(body.code, &body.msg);
        body.into_response()
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        };
        log_error(body.code, &body.msg);
        body.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Api;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_log(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn server_failures_log_as_errors_and_client_failures_as_warnings() {
        let log = captured_log(|| {
            let body = SearchError::Timeout(Api::Summon).to_body();
            log_error(body.code, &body.msg);
        });
        assert!(log.contains("ERROR"), "{}", log);
        assert!(log.contains("504"));

        let log = captured_log(|| {
            let body = SearchError::MissingQuery.to_body();
            log_error(body.code, &body.msg);
        });
        assert!(log.contains("WARN"), "{}", log);
        assert!(!log.contains("ERROR"));
    }

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_matches_error_code() {
        let response = SearchError::MissingFacet("colour".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_of(response).await;
        assert_eq!(body.code, 404);
        assert_eq!(body.msg, "Missing facet: colour");

        let response = SearchError::Timeout(Api::Summon).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_of(response).await.code, 504);

        let response = BlogError::Status(500).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_of(response).await.code, 502);
    }
}
