use crate::{
    errors::{DocentError, DocentResult},
    logging::{log_api_call, ApiCallLog},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Client for the document assistant's `POST /chat/` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one message and returns the bot's reply.
    ///
    /// Makes a single attempt. Transport failures, non-2xx statuses and
    /// malformed bodies all come back as errors.
    pub async fn send_message(&self, text: &str) -> DocentResult<String> {
        let start_time = Instant::now();

        let result = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest { text })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log_api_call(&ApiCallLog {
                    endpoint: self.endpoint.clone(),
                    response_status: None,
                    response_time_ms: start_time.elapsed().as_millis(),
                });
                return Err(e.into());
            }
        };

        let status = response.status();
        log_api_call(&ApiCallLog {
            endpoint: self.endpoint.clone(),
            response_status: Some(status.as_u16()),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocentError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| DocentError::api_error(format!("Failed to parse API response: {}", e)))?;

        Ok(body.response)
    }
}
