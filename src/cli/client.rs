use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::handlers::protected::auth::me::MeResponse;
use crate::handlers::public::auth::signin::SigninResponse;
use crate::handlers::public::auth::MessageResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Thin HTTP client for the passgate endpoints
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(server)?;
        // Relative joins replace the last path segment unless it ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("signup")?)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn signin(&self, username: &str, password: &str) -> Result<SigninResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("signin")?)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn me(&self, token: &str) -> Result<MeResponse, ClientError> {
        let response = self
            .http
            .get(self.endpoint("me")?)
            .bearer_auth(token)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn users(&self) -> Result<Vec<Value>, ClientError> {
        let response = self.http.get(self.endpoint("users")?).send().await?;
        Self::parse(response).await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        let response = self.http.get(self.endpoint("health")?).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        // Error bodies carry a "message"; fall back to the status text
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        Err(ClientError::Api { status, message })
    }
}
