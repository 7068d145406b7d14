//! Remote todo source.

use crate::config::PollerConfig;
use crate::todo::Todo;
use async_trait::async_trait;
use thiserror::Error;

/// Everything that can go wrong with a single fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed todo payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can produce the current todo list.
#[async_trait]
pub trait TodoSource: Send + Sync {
    /// Fetch the list once. Exactly one outbound request per call.
    async fn fetch(&self) -> Result<Vec<Todo>, FetchError>;
}

/// Fetches todos with `GET {endpoint}?_limit={limit}`.
#[derive(Debug, Clone)]
pub struct HttpTodoSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
}

impl HttpTodoSource {
    pub fn new(config: &PollerConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            limit: config.limit,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TodoSource for HttpTodoSource {
    async fn fetch(&self) -> Result<Vec<Todo>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_limit", self.limit)])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> PollerConfig {
        PollerConfig {
            endpoint: format!("{}/todos", server.uri()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_in_response_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"userId": 1, "id": 3, "title": "fugiat veniam minus", "completed": false},
                {"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false},
                {"userId": 1, "id": 2, "title": "quis ut nam facilis", "completed": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpTodoSource::new(&config_for(&server)).unwrap();
        let todos = source.fetch().await.unwrap();

        let ids: Vec<u64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(todos[2].completed);
    }

    #[tokio::test]
    async fn test_fetch_uses_configured_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let config = PollerConfig {
            limit: 2,
            ..config_for(&server)
        };
        let source = HttpTodoSource::new(&config).unwrap();
        assert!(source.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpTodoSource::new(&config_for(&server)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_fetch_maps_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = HttpTodoSource::new(&config_for(&server)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = PollerConfig {
            request_timeout: Duration::from_millis(100),
            ..config_for(&server)
        };
        let source = HttpTodoSource::new(&config).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let config = PollerConfig {
            endpoint: "http://127.0.0.1:1/todos".to_string(),
            ..Default::default()
        };
        let source = HttpTodoSource::new(&config).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
