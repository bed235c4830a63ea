use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::{reject_error_field, Action};
use crate::shared::AppError;

/// HTTP transport for the action-based backend endpoint
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    endpoint: String,
}

impl BackendClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// GET `?action=<action>&<params>` and decode the body as `T`
    #[instrument(skip(self, action, params), fields(action = %action))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        action: Action,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T, AppError> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        query.push(("action", action.as_ref()));
        query.extend_from_slice(params);

        let request = self.http.get(&self.endpoint).query(&query);
        let value = self.execute(request, timeout).await?;
        decode(value)
    }

    /// POST a form body carrying `action` plus `fields` and decode the body as `T`
    #[instrument(skip(self, action, fields), fields(action = %action))]
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        action: Action,
        fields: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, AppError> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(fields.len() + 1);
        form.push(("action", action.as_ref()));
        form.extend(fields.iter().map(|(k, v)| (*k, v.as_str())));

        let request = self.http.post(&self.endpoint).form(&form);
        let value = self.execute(request, timeout).await?;
        decode(value)
    }

    /// Sends the request and reads the body, bounded by `timeout` end to end
    async fn execute(&self, request: RequestBuilder, timeout: Duration) -> Result<Value, AppError> {
        let exchange = async {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let body = response.bytes().await.map_err(transport_error)?;
            Ok::<_, AppError>((status, body))
        };

        let (status, body) = match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Backend request timed out"
                );
                return Err(AppError::Timeout(timeout));
            }
        };

        debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");

        // An error field wins over the status code
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => {
                let value = reject_error_field(value)?;
                if !status.is_success() {
                    return Err(AppError::HttpStatus(status.as_u16()));
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(AppError::HttpStatus(status.as_u16())),
            Err(e) => Err(AppError::MalformedResponse(e.to_string())),
        }
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    debug!(error = %e, "Backend transport failure");
    AppError::Transport(e.to_string())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::MalformedResponse(e.to_string()))
}
