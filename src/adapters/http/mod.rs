//! HTTP adapters backed by one shared `reqwest` client.
//!
//! - `HttpResource<R>`: `RecordSource` for the users and videos services
//! - `HttpIndex`: `IndexSink` for the index service

mod index;
mod resource;

pub use index::HttpIndex;
pub use resource::HttpResource;

use crate::application::processor::ItemProcessor;
use crate::config::EngineConfig;
use crate::domain::records::{User, Video};
use reqwest::Client;
use std::time::Duration;

/// Item processor wired to the real remote services.
pub type HttpProcessor = ItemProcessor<HttpResource<User>, HttpResource<Video>, HttpIndex>;

/// Build the client shared by every adapter. Gzip bodies are decoded transparently.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).gzip(true).build()
}

/// Wire an item processor against the services named in `config`.
pub fn http_processor(config: &EngineConfig) -> Result<HttpProcessor, reqwest::Error> {
    let client = build_client(config.http_timeout)?;

    Ok(ItemProcessor::new(
        HttpResource::new(client.clone(), &config.users_url),
        HttpResource::new(client.clone(), &config.videos_url),
        HttpIndex::new(client, &config.index_url),
    ))
}
