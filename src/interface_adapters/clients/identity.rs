use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use crate::domain::entities::VerifiedIdentity;
use crate::domain::errors::IdentityError;
use crate::domain::ports::IdentityProvider;

#[derive(Debug, Serialize)]
struct VerifyTokenRequest<'a> {
    token: &'a str,
}

// Thin reqwest client for the external identity service.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let url = format!("{}/auth/verify-token", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&VerifyTokenRequest { token })
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "identity service request failed");
                IdentityError::Unavailable
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<VerifiedIdentity>().await.map_err(|err| {
                tracing::warn!(error = %err, "identity service returned malformed body");
                IdentityError::Unavailable
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(IdentityError::InvalidToken);
        }

        tracing::warn!(%status, "identity service rejected verification request");
        Err(IdentityError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_identity(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/auth/verify-token",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> IdentityClient {
        IdentityClient::new(base_url, Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn when_provider_accepts_token_then_uid_is_returned() {
        let base_url = spawn_identity(StatusCode::OK, json!({"uid": "trainer-1"})).await;

        let identity = client(&base_url).verify_token("abc").await.unwrap();

        assert_eq!(identity.uid, "trainer-1");
    }

    #[tokio::test]
    async fn when_provider_returns_401_then_token_is_invalid() {
        let base_url =
            spawn_identity(StatusCode::UNAUTHORIZED, json!({"message": "invalid"})).await;

        let err = client(&base_url).verify_token("abc").await.unwrap_err();

        assert_eq!(err, IdentityError::InvalidToken);
    }

    #[tokio::test]
    async fn when_provider_fails_then_it_is_unavailable() {
        let base_url =
            spawn_identity(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})).await;

        let err = client(&base_url).verify_token("abc").await.unwrap_err();

        assert_eq!(err, IdentityError::Unavailable);
    }

    #[tokio::test]
    async fn when_provider_is_unreachable_then_it_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/"))
            .verify_token("abc")
            .await
            .unwrap_err();

        assert_eq!(err, IdentityError::Unavailable);
    }
}
