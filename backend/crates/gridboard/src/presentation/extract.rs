//! Request Extractors
//!
//! `JsonBody` wraps `axum::Json` so malformed or incomplete bodies come back
//! as a 400 problem document instead of axum's plain-text rejection.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::GridboardError;

/// JSON request body with gridboard error rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GridboardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(GridboardError::validation(rejection_message(&rejection))),
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected 'Content-Type: application/json'".to_string()
        }
        _ => "Could not read request body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Named, GridboardError> {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        JsonBody::<Named>::from_request(req, &()).await.map(|JsonBody(v)| v)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let named = extract(Some("application/json"), r#"{"name":"Copa"}"#)
            .await
            .unwrap();
        assert_eq!(named.name, "Copa");
    }

    #[tokio::test]
    async fn test_rejections_become_validation() {
        for (content_type, body) in [
            (Some("application/json"), "{ nope"),
            (Some("application/json"), r#"{"other":1}"#),
            (None, r#"{"name":"Copa"}"#),
        ] {
            let err = extract(content_type, body).await.unwrap_err();
            assert!(matches!(err, GridboardError::Validation(_)));
        }
    }
}
