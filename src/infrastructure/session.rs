use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::CommerceError;
use crate::domain::ports::TokenStore;

/// Header carrying the session token in both directions.
pub const TOKEN_HEADER: &str = "vendure-token";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorBody {
    message: String,
}

/// GraphQL-over-HTTP client bound to one shopping session.
///
/// Every call reads the token fresh from the store and any rotated token the
/// backend returns is written back before the caller sees the result. There is
/// no caching and no retry at this level.
pub struct SessionClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenStore>,
    channel_token: Option<String>,
}

impl SessionClient {
    pub fn new(endpoint: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            tokens,
            channel_token: None,
        }
    }

    /// Token sent while the backend has not issued a session token yet.
    pub fn with_channel_token(mut self, token: Option<String>) -> Self {
        self.channel_token = token;
        self
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Sends `operation` and returns the `data` object.
    pub async fn send(&self, operation: &str, variables: Value) -> Result<Value, CommerceError> {
        self.execute(operation, &variables).await
    }

    /// Like [`send`](Self::send) but gives up after `deadline`.
    pub async fn send_with_deadline(
        &self,
        operation: &str,
        variables: Value,
        deadline: Duration,
    ) -> Result<Value, CommerceError> {
        tokio::time::timeout(deadline, self.execute(operation, &variables))
            .await
            .map_err(|_| CommerceError::Timeout)?
    }

    /// Sends an order mutation and unwraps the `Order | ErrorResult` union
    /// found at `data.<field>`.
    pub async fn mutate_order(
        &self,
        operation: &str,
        variables: Value,
        field: &str,
    ) -> Result<Value, CommerceError> {
        let data = self.send(operation, variables).await?;
        order_result(data, field)
    }

    async fn execute(&self, operation: &str, variables: &Value) -> Result<Value, CommerceError> {
        let mut request = self.http.post(&self.endpoint).json(&GraphQlRequest {
            query: operation,
            variables,
        });

        let current = self.tokens.get();
        if let Some(token) = current.as_ref().or(self.channel_token.as_ref()) {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;

        if let Some(rotated) = response
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            if current.as_deref() != Some(rotated) {
                log::debug!("Session token rotated by backend");
                self.tokens.set(rotated);
            }
        }

        let status = response.status();
        if !status.is_success() {
            log::warn!("Commerce API answered with status {}", status);
            return Err(CommerceError::Transport {
                status: status.as_u16(),
            });
        }

        let body: GraphQlResponse = response.json().await?;
        if let Some(first) = body.errors.first() {
            log::warn!("GraphQL error: {}", first.message);
            return Err(CommerceError::GraphQl(first.message.clone()));
        }

        body.data
            .ok_or_else(|| CommerceError::Decode("response carries no data".to_string()))
    }
}

/// Extracts `data.<field>`, turning the `ErrorResult` variant into
/// [`CommerceError::Domain`].
pub fn order_result(mut data: Value, field: &str) -> Result<Value, CommerceError> {
    let node = match data.get_mut(field).map(Value::take) {
        Some(Value::Null) | None => {
            return Err(CommerceError::Decode(format!("missing field '{field}'")));
        }
        Some(node) => node,
    };

    if let Some(error_code) = node.get("errorCode").and_then(Value::as_str) {
        let message = node
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        log::warn!("{} rejected: {} ({})", field, message, error_code);
        return Err(CommerceError::Domain {
            error_code: error_code.to_string(),
            message: message.to_string(),
        });
    }

    Ok(node)
}
