use crate::domain::records::{JoinedRecord, User, Video};
use crate::domain::work::WorkItem;
use crate::error::ProcessError;
use crate::ports::index::IndexSink;
use crate::ports::resource::RecordSource;

/// Runs the fetch user, fetch video, submit sequence for one work item.
///
/// The steps run strictly in that order and the first failure ends the run.
/// No retries happen here; the worker pool re-enqueues the whole item.
pub struct ItemProcessor<U, V, I> {
    users: U,
    videos: V,
    index: I,
}

impl<U, V, I> ItemProcessor<U, V, I>
where
    U: RecordSource<User>,
    V: RecordSource<Video>,
    I: IndexSink,
{
    pub fn new(users: U, videos: V, index: I) -> Self {
        Self {
            users,
            videos,
            index,
        }
    }

    pub async fn process(&self, item: &WorkItem) -> Result<JoinedRecord, ProcessError> {
        let user = self
            .users
            .fetch(&item.user_id)
            .await
            .map_err(ProcessError::User)?;

        let video = self
            .videos
            .fetch(&item.video_id)
            .await
            .map_err(ProcessError::Video)?;

        let record = JoinedRecord::new(user, video);
        self.index
            .submit(&record)
            .await
            .map_err(ProcessError::Submit)?;

        Ok(record)
    }
}
