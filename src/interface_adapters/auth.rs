use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, StatusCode};
use axum::Json;
use std::sync::Arc;

use crate::domain::errors::IdentityError;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;

// Trainer identity resolved from the bearer token of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedTrainer {
    pub user_id: String,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedTrainer {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "No token provided"))?;

        match state.identity.verify_token(token).await {
            Ok(identity) => Ok(Self {
                user_id: identity.uid,
            }),
            Err(IdentityError::InvalidToken) => {
                Err(error_response(StatusCode::UNAUTHORIZED, "Invalid token"))
            }
            Err(IdentityError::Unavailable) => Err(error_response(
                StatusCode::BAD_GATEWAY,
                "identity service unavailable",
            )),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn when_header_is_bearer_then_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn when_header_is_missing_or_malformed_then_no_token() {
        assert_eq!(bearer_token(&parts_with(None)), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer   "))), None);
    }
}
