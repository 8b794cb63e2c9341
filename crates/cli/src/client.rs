//! API client for the EV Charging Predictor service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DURATION_PATH: &str = "api/ai/predict/duration";
pub const FAULT_PATH: &str = "api/ai/predict/fault";
pub const HEALTH_PATH: &str = "health";

/// Failures reported by, or on the way to, the service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with an error envelope
    #[error("{code}: {message}")]
    Api { code: u16, message: String },

    /// The service could not be reached
    #[error("service unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let mut base_url = Url::parse(base_url).context("Invalid API URL")?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request and unwrap the response envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        read_envelope(response).await
    }

    /// Make a POST request with JSON body and unwrap the response envelope
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        read_envelope(response).await
    }

    fn unavailable(&self, error: reqwest::Error) -> ClientError {
        ClientError::Unavailable {
            url: self.base_url.to_string(),
            reason: error.to_string(),
        }
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.context("Failed to read response")?;

    match serde_json::from_str::<Envelope<T>>(&body) {
        Ok(envelope) if status.is_success() && envelope.code == 200 => envelope
            .data
            .context("Response envelope carries no data"),
        Ok(envelope) => Err(ClientError::Api {
            code: envelope.code,
            message: envelope.message,
        }
        .into()),
        Err(_) if !status.is_success() => Err(ClientError::Api {
            code: status.as_u16(),
            message: body,
        }
        .into()),
        Err(e) => Err(e).context("Failed to parse response"),
    }
}

// API response types

/// `{code, message, data}` wrapper around every service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationPrediction {
    pub duration_minutes: f64,
    pub duration_hours: f64,
    pub charge_amount: f64,
    pub estimated_cost: f64,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultPrediction {
    pub fault_probability: f64,
    pub will_fault: bool,
    pub risk_level: String,
    pub risk_text: String,
    pub suggestion: String,
    pub suggestions: Vec<String>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub duration_model_loaded: bool,
    pub fault_model_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = ApiClient::new("http://gateway.local/ev").unwrap();
        assert_eq!(client.base_url().as_str(), "http://gateway.local/ev/");
        assert_eq!(
            client.base_url().join(DURATION_PATH).unwrap().as_str(),
            "http://gateway.local/ev/api/ai/predict/duration"
        );

        let client = ApiClient::new("http://gateway.local/ev/").unwrap();
        assert_eq!(client.base_url().as_str(), "http://gateway.local/ev/");
    }

    #[tokio::test]
    async fn test_requests_sent_under_path_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ev/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "message": "ok",
                    "data": {
                        "duration_model_loaded": false,
                        "fault_model_loaded": true
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&format!("{}/ev", server.url())).unwrap();
        let status: ModelStatus = client.get(HEALTH_PATH).await.unwrap();

        assert!(!status.duration_model_loaded);
        assert!(status.fault_model_loaded);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_unwraps_success_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ai/predict/duration")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "message": "prediction succeeded",
                    "data": {
                        "duration_minutes": 43.2,
                        "duration_hours": 0.72,
                        "charge_amount": 36.0,
                        "estimated_cost": 28.8,
                        "source": "heuristic"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let prediction: DurationPrediction = client
            .post(DURATION_PATH, &json!({ "battery_capacity": 60 }))
            .await
            .unwrap();

        assert_eq!(prediction.duration_minutes, 43.2);
        assert_eq!(prediction.source, "heuristic");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/ai/predict/fault")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 400,
                    "message": "VALIDATION_ERROR: missing required fields: health_score",
                    "data": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client
            .post::<FaultPrediction, _>(FAULT_PATH, &json!({}))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "400: VALIDATION_ERROR: missing required fields: health_score"
        );
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Api { code: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_non_envelope_error_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.get::<ModelStatus>(HEALTH_PATH).await.unwrap_err();

        assert_eq!(err.to_string(), "502: bad gateway");
    }

    #[tokio::test]
    async fn test_get_model_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(
                json!({
                    "code": 200,
                    "message": "ok",
                    "data": { "duration_model_loaded": true, "fault_model_loaded": false }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let status: ModelStatus = client.get(HEALTH_PATH).await.unwrap();

        assert!(status.duration_model_loaded);
        assert!(!status.fault_model_loaded);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        // Port 9 (discard) is expected to refuse connections
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.get::<ModelStatus>(HEALTH_PATH).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
