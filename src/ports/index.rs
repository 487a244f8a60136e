use crate::domain::records::JoinedRecord;
use crate::error::RemoteError;
use async_trait::async_trait;

/// The index service joined records are submitted to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Submit one joined record. Succeeds only when the service accepted it.
    async fn submit(&self, record: &JoinedRecord) -> Result<(), RemoteError>;
}
