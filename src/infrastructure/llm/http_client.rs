use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::domain::DomainError;

/// Stream type for HTTP responses
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// JSON-over-HTTP transport used by providers (mockable in tests)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, DomainError>;

    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<ByteStream, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<reqwest::Response, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.client.post(url), |request, (key, value)| {
                request.header(key, value)
            });

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::provider("http", format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "http",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<Value, DomainError> {
        self.send(url, headers, body)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &Value,
    ) -> Result<ByteStream, DomainError> {
        let stream = self.send(url, headers, body).await?.bytes_stream().map(|result| {
            result.map_err(|e| DomainError::provider("http", format!("Stream error: {}", e)))
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use futures::stream;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Canned responses keyed by URL; records request bodies
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        responses: RwLock<HashMap<String, Value>>,
        stream_responses: RwLock<HashMap<String, Vec<Bytes>>>,
        errors: RwLock<HashMap<String, String>>,
        bodies: RwLock<Vec<Value>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, url: impl Into<String>, response: Value) -> Self {
            self.responses.write().unwrap().insert(url.into(), response);
            self
        }

        pub fn with_stream_response(self, url: impl Into<String>, chunks: Vec<Bytes>) -> Self {
            self.stream_responses
                .write()
                .unwrap()
                .insert(url.into(), chunks);
            self
        }

        pub fn with_error(self, url: impl Into<String>, error: impl Into<String>) -> Self {
            self.errors.write().unwrap().insert(url.into(), error.into());
            self
        }

        pub fn bodies(&self) -> Vec<Value> {
            self.bodies.read().unwrap().clone()
        }

        fn record(&self, url: &str, body: &Value) -> Result<(), DomainError> {
            self.bodies.write().unwrap().push(body.clone());
            match self.errors.read().unwrap().get(url) {
                Some(error) => Err(DomainError::provider("mock", error)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn post_json(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &Value,
        ) -> Result<Value, DomainError> {
            self.record(url, body)?;

            self.responses
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| DomainError::provider("mock", format!("No mock response for {}", url)))
        }

        async fn post_json_stream(
            &self,
            url: &str,
            _headers: Vec<(&str, &str)>,
            body: &Value,
        ) -> Result<ByteStream, DomainError> {
            self.record(url, body)?;

            let chunks = self
                .stream_responses
                .read()
                .unwrap()
                .get(url)
                .cloned()
                .unwrap_or_default();

            Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
        }
    }
}
