use serde::{Deserialize, Serialize};

/// A user as returned by the users service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub language: String,
    pub last_ip: String,
}

/// A video as returned by the videos service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub privacy: String,
    pub frame_rate: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub audio_sample_rate: String,
}

/// The `{ "data": ... }` wrapper both resource services respond with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Payload posted to the index service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub user: User,
    pub video: Video,
}

impl JoinedRecord {
    pub fn new(user: User, video: Video) -> Self {
        Self { user, video }
    }
}
