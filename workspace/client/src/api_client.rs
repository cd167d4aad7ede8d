pub mod auth;
pub mod forms;
pub mod prediction;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

/// Errors surfaced by the typed client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Error body: the API answers `{error, code}` for most failures and
/// `{message}` for predictor failures.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Client for the Centro Médico del ASMA API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Common GET request handler
    async fn get_json<T>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        debug!("GET {}", endpoint);
        let mut request = self.http.get(self.url(endpoint));
        if !query.is_empty() {
            request = request.query(query);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::decode(endpoint, request.send().await?).await
    }

    /// Common POST request handler
    async fn post_json<T, B>(
        &self,
        endpoint: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        debug!("POST {}", endpoint);
        let mut request = self.http.post(self.url(endpoint)).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::decode(endpoint, request.send().await?).await
    }

    async fn decode<T>(endpoint: &str, response: reqwest::Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.into_message(),
                Err(_) => status.to_string(),
            };
            error!("{} - API error {}: {}", endpoint, status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/");
        assert_eq!(client.url("/api/forms/mine"), "http://localhost:3001/api/forms/mine");
    }

    #[test]
    fn error_body_prefers_the_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"DNI inválido","code":"INVALID_DNI"}"#).unwrap();
        assert_eq!(body.into_message(), "DNI inválido");

        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Error llamando al predictor"}"#).unwrap();
        assert_eq!(body.into_message(), "Error llamando al predictor");

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_message(), "unknown error");
    }
}
