//! Identity Toolkit REST implementation of the identity gateway

use super::{IdentityError, IdentityProvider};
use crate::gcp::TokenProvider;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct RestIdentity {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    tokens: TokenProvider,
}

impl RestIdentity {
    pub fn new(base_url: &str, project_id: &str, tokens: TokenProvider) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            tokens,
        }
    }

    async fn post(&self, url: &str, body: Value) -> Result<reqwest::Response, IdentityError> {
        let mut request = self.http.post(url).json(&body);
        if let Some(token) = self.tokens.token().await? {
            request = request.bearer_auth(token);
        }
        Ok(request
            .send()
            .await
            .context("identity provider unreachable")?)
    }

    /// Pull the provider's error code out of a failed response body:
    /// `{"error": {"message": "EMAIL_EXISTS", ...}}`.
    async fn rejection(response: reqwest::Response) -> IdentityError {
        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                return IdentityError::Other(anyhow!(
                    "identity provider returned {status} with unreadable body: {err}"
                ))
            }
        };
        match body["error"]["message"].as_str() {
            Some(code) if status.is_client_error() => IdentityError::rejected(code),
            _ => IdentityError::Other(anyhow!("identity provider returned {status}: {body}")),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[async_trait]
impl IdentityProvider for RestIdentity {
    async fn create_principal(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        let url = format!(
            "{}/v1/projects/{}/accounts",
            self.base_url, self.project_id
        );
        let response = self
            .post(
                &url,
                json!({
                    "email": email,
                    "password": password,
                    "emailVerified": false,
                    "disabled": false,
                }),
            )
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: SignUpResponse = response
            .json()
            .await
            .context("malformed sign-up response")
            .map_err(IdentityError::Other)?;
        Ok(body.local_id)
    }

    async fn delete_principal(&self, uid: &str) -> Result<(), IdentityError> {
        let url = format!(
            "{}/v1/projects/{}/accounts:delete",
            self.base_url, self.project_id
        );
        let response = self.post(&url, json!({ "localId": uid })).await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }
}
