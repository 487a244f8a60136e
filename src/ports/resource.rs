use crate::error::RemoteError;
use async_trait::async_trait;

/// A remote service that resolves an identifier to a record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource<R: Send + Sync + 'static>: Send + Sync {
    /// Fetch the record identified by `id`
    async fn fetch(&self, id: &str) -> Result<R, RemoteError>;
}
