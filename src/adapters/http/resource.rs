use crate::domain::records::Envelope;
use crate::error::RemoteError;
use crate::ports::resource::RecordSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// HttpResource implements RecordSource with `GET {base_url}/{id}`.
pub struct HttpResource<R> {
    client: Client,
    base_url: String,
    record: PhantomData<fn() -> R>,
}

impl<R> HttpResource<R> {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            record: PhantomData,
        }
    }

    fn url_for(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl<R> Clone for HttpResource<R> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone(), self.base_url.clone())
    }
}

#[async_trait]
impl<R> RecordSource<R> for HttpResource<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch(&self, id: &str) -> Result<R, RemoteError> {
        let url = self.url_for(id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<R> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{build_client, stub};
    use crate::domain::records::{User, Video};
    use axum::http::{header, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::json;
    use std::io::Write;
    use std::time::Duration;

    fn client() -> Client {
        build_client(Duration::from_secs(3)).unwrap()
    }

    fn john_smith() -> serde_json::Value {
        json!({
            "data": {
                "id": 1,
                "fullName": "John Smith",
                "email": "john.smith@gmail.com",
                "country": "Antigua",
                "language": "Dutch",
                "lastIp": "10.10.10.10"
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_user() {
        let router = Router::new().route("/users/1000", get(|| async { Json(john_smith()) }));
        let base = stub::serve(router).await;

        let users: HttpResource<User> = HttpResource::new(client(), format!("{}/users", base));
        let user = users.fetch("1000").await.unwrap();

        assert_eq!(
            user,
            User {
                id: 1,
                full_name: "John Smith".to_string(),
                email: "john.smith@gmail.com".to_string(),
                country: "Antigua".to_string(),
                language: "Dutch".to_string(),
                last_ip: "10.10.10.10".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_gzip_video() {
        let body = json!({
            "data": {
                "id": 1,
                "title": "Joe Rogan Experience #1114 - Matt Taibbi",
                "caption": "Matt Taibbi is a journalist and author...",
                "privacy": "public",
                "frameRate": "60",
                "videoCodec": "H.264",
                "audioCodec": "AAC",
                "audioSampleRate": "128"
            }
        });
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body.to_string().as_bytes()).unwrap();
        let compressed = bytes::Bytes::from(encoder.finish().unwrap());

        let router = Router::new().route(
            "/videos/1000",
            get(move || {
                let compressed = compressed.clone();
                async move {
                    (
                        [
                            (header::CONTENT_ENCODING, "gzip"),
                            (header::CONTENT_TYPE, "application/json"),
                        ],
                        compressed,
                    )
                        .into_response()
                }
            }),
        );
        let base = stub::serve(router).await;

        let videos: HttpResource<Video> = HttpResource::new(client(), format!("{}/videos", base));
        let video = videos.fetch("1000").await.unwrap();

        assert_eq!(video.id, 1);
        assert_eq!(video.video_codec, "H.264");
        assert_eq!(video.audio_sample_rate, "128");
    }

    #[tokio::test]
    async fn test_fetch_server_down() {
        let router = Router::new().route(
            "/users/1000",
            get(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
        );
        let base = stub::serve(router).await;

        let users: HttpResource<User> = HttpResource::new(client(), format!("{}/users", base));
        let err = users.fetch("1000").await.unwrap_err();

        match err {
            RemoteError::Status { url, status } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/users/1000"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let router = Router::new().route("/users/1", get(|| async { "not json" }));
        let base = stub::serve(router).await;

        let users: HttpResource<User> = HttpResource::new(client(), format!("{}/users", base));
        let err = users.fetch("1").await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let users: HttpResource<User> = HttpResource::new(client(), format!("http://{}/users", addr));
        let err = users.fetch("1").await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
