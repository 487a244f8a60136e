use crate::error::LineError;

/// A single (user, video) pair awaiting join and submission.
///
/// Identity is structural: the same pair may sit in the queue several times
/// (the first submission plus any retries).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub user_id: String,
    pub video_id: String,
}

impl WorkItem {
    pub fn new(user_id: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            video_id: video_id.into(),
        }
    }

    /// Parse one `user_id,video_id` input line.
    ///
    /// Both fields must be present, non-empty and valid 32-bit integers.
    pub fn parse_line(line: &str) -> Result<Self, LineError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(LineError::FieldCount(fields.len()));
        }

        for field in &fields {
            if field.is_empty() {
                return Err(LineError::Empty);
            }
            if field.parse::<i32>().is_err() {
                return Err(LineError::NotInteger(field.to_string()));
            }
        }

        Ok(Self::new(fields[0], fields[1]))
    }
}
