use crate::domain::records::JoinedRecord;
use crate::error::RemoteError;
use crate::ports::index::IndexSink;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// HttpIndex implements IndexSink with a JSON `POST` to the index endpoint.
#[derive(Clone)]
pub struct HttpIndex {
    client: Client,
    url: String,
}

impl HttpIndex {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IndexSink for HttpIndex {
    async fn submit(&self, record: &JoinedRecord) -> Result<(), RemoteError> {
        // `json` sets Content-Type: application/json
        let response = self.client.post(&self.url).json(record).send().await?;

        if response.status() != StatusCode::CREATED {
            return Err(RemoteError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{build_client, stub};
    use crate::domain::records::{User, Video};
    use axum::http::{header, HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn record() -> JoinedRecord {
        JoinedRecord::new(
            User {
                id: 1,
                full_name: "John Smith".to_string(),
                ..Default::default()
            },
            Video {
                id: 1,
                title: "X".to_string(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_submit_created() {
        let seen: Arc<Mutex<Option<(String, serde_json::Value)>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();

        let router = Router::new().route(
            "/index",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let captured = captured.clone();
                async move {
                    let content_type = headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((content_type, body));
                    AxumStatus::CREATED
                }
            }),
        );
        let base = stub::serve(router).await;

        let index = HttpIndex::new(build_client(Duration::from_secs(3)).unwrap(), format!("{}/index", base));
        index.submit(&record()).await.unwrap();

        let (content_type, body) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(content_type, "application/json");
        assert_eq!(body["user"]["fullName"], "John Smith");
        assert_eq!(body["video"]["title"], "X");
    }

    #[tokio::test]
    async fn test_submit_ok_is_not_created() {
        let router = Router::new().route("/index", post(|| async { AxumStatus::OK }));
        let base = stub::serve(router).await;

        let index = HttpIndex::new(build_client(Duration::from_secs(3)).unwrap(), format!("{}/index", base));
        let err = index.submit(&record()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_submit_server_down() {
        let router = Router::new().route(
            "/index",
            post(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
        );
        let base = stub::serve(router).await;

        let index = HttpIndex::new(build_client(Duration::from_secs(3)).unwrap(), format!("{}/index", base));
        let err = index.submit(&record()).await.unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 503, .. }));
    }
}
