// file: src/ocr/client.rs
// description: Mistral OCR API client with retry and exponential backoff
// reference: https://docs.mistral.ai/api/#tag/ocr

use crate::config::ApiConfig;
use crate::error::{OcrError, Result};
use crate::models::{OcrRequest, OcrResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

const OCR_PATH: &str = "/v1/ocr";

pub struct MistralOcrClient {
    http: Client,
    api_key: String,
    endpoint: String,
    retry_attempts: usize,
    retry_backoff: Duration,
}

impl MistralOcrClient {
    pub fn new(api_key: String, config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), OCR_PATH),
            retry_attempts: config.retry_attempts,
            retry_backoff: config.retry_backoff(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn process(&self, request: &OcrRequest) -> Result<OcrResponse> {
        let body = self.process_raw(request).await?;
        serde_json::from_value(body).map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }

    /// Runs the request and returns the response body as untyped JSON.
    pub async fn process_raw(&self, request: &OcrRequest) -> Result<serde_json::Value> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.send(request).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt <= self.retry_attempts => {
                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "OCR attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("OCR request failed after {} attempts: {}", attempt, e);
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn send(&self, request: &OcrRequest) -> Result<serde_json::Value> {
        debug!(
            "Calling Mistral OCR API: model={}, include_images={}",
            request.model, request.include_image_base64
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OcrError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        // read errors here include the client timeout
        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body).map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }

    pub fn calculate_backoff(&self, attempt: usize) -> Duration {
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        self.retry_backoff.saturating_mul(multiplier)
    }
}

fn transport_error(e: reqwest::Error) -> OcrError {
    if e.is_timeout() {
        OcrError::Timeout(e.to_string())
    } else {
        OcrError::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::DocumentInput;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_config(base_url: &str, retry_attempts: usize) -> ApiConfig {
        let mut config = Config::default_config().api;
        config.base_url = base_url.to_string();
        config.retry_attempts = retry_attempts;
        config.retry_backoff_ms = 1;
        config
    }

    fn request() -> OcrRequest {
        OcrRequest::new(
            "mistral-ocr-latest",
            DocumentInput::document_url("data:application/pdf;base64,JVBERg=="),
            true,
        )
    }

    fn page_body() -> serde_json::Value {
        json!({
            "pages": [{"index": 0, "markdown": "# Hello", "images": []}],
            "model": "mistral-ocr-latest",
            "usage_info": {"pages_processed": 1, "doc_size_bytes": 4}
        })
    }

    // Answers every connection with headers and a truncated body, then goes quiet.
    async fn stalled_body_server(connections: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                connections.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 64 * 1024];
                    let mut received: Vec<u8> = Vec::new();
                    while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => received.extend_from_slice(&buf[..n]),
                        }
                    }
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"pages\": [",
                        )
                        .await;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_calculate_backoff() {
        let mut config = Config::default_config().api;
        config.retry_backoff_ms = 200;
        let client = MistralOcrClient::new("key".to_string(), &config).unwrap();

        assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
        assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = api_config("http://localhost:9000/", 0);
        let client = MistralOcrClient::new("key".to_string(), &config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/ocr");
    }

    #[tokio::test]
    async fn test_process_sends_auth_and_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "mistral-ocr-latest",
                "document": {"type": "document_url"},
                "include_image_base64": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("test-key".to_string(), &api_config(&server.uri(), 0)).unwrap();
        let response = client.process(&request()).await.unwrap();

        assert_eq!(response.pages.len(), 1);
        assert_eq!(response.pages[0].markdown, "# Hello");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("bad-key".to_string(), &api_config(&server.uri(), 3)).unwrap();
        let err = client.process(&request()).await.unwrap_err();

        match err {
            OcrError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("key".to_string(), &api_config(&server.uri(), 2)).unwrap();
        let response = client.process(&request()).await.unwrap();

        assert_eq!(response.pages[0].markdown, "# Hello");
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("key".to_string(), &api_config(&server.uri(), 2)).unwrap();
        let err = client.process(&request()).await.unwrap_err();

        assert!(matches!(err, OcrError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("key".to_string(), &api_config(&server.uri(), 0)).unwrap();
        let err = client.process(&request()).await.unwrap_err();

        assert!(matches!(err, OcrError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_process_raw_keeps_unknown_fields() {
        let server = MockServer::start().await;
        let mut body = page_body();
        body["document_annotation"] = json!("{\"title\": \"Hello\"}");

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let client =
            MistralOcrClient::new("key".to_string(), &api_config(&server.uri(), 0)).unwrap();
        let raw = client.process_raw(&request()).await.unwrap();

        assert_eq!(raw, body);
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/ocr"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = api_config(&server.uri(), 0);
        config.timeout_secs = 1;
        let client = MistralOcrClient::new("key".to_string(), &config).unwrap();
        let err = client.process(&request()).await.unwrap_err();

        assert!(matches!(err, OcrError::Timeout(_)), "got {:?}", err);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_stalled_body_is_timeout_and_retried() {
        let connections = Arc::new(AtomicUsize::new(0));
        let base_url = stalled_body_server(connections.clone()).await;

        let mut config = api_config(&base_url, 1);
        config.timeout_secs = 1;
        let client = MistralOcrClient::new("key".to_string(), &config).unwrap();
        let err = client.process(&request()).await.unwrap_err();

        assert!(matches!(err, OcrError::Timeout(_)), "got {:?}", err);
        assert_eq!(connections.load(Ordering::SeqCst), 2);
    }
}
