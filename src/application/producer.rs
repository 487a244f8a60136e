//! Turns a line-oriented input stream into validated work items.

use crate::domain::work::WorkItem;
use futures::stream::{self, Stream};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

/// Lazily read `user_id,video_id` lines from `reader`.
///
/// Invalid lines, including ones that are not UTF-8, are skipped. The stream
/// ends at end of input or on a read error.
pub fn work_items<R>(reader: R) -> impl Stream<Item = WorkItem>
where
    R: AsyncRead + Unpin,
{
    let segments = BufReader::new(reader).split(b'\n');

    stream::unfold(segments, |mut segments| async move {
        loop {
            match segments.next_segment().await {
                Ok(Some(bytes)) => {
                    if let Some(item) = decode_line(bytes) {
                        return Some((item, segments));
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    return None;
                }
            }
        }
    })
}

fn decode_line(mut bytes: Vec<u8>) -> Option<WorkItem> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }

    let line = match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            debug!("Skipping line {:?}: {}", String::from_utf8_lossy(e.as_bytes()), e);
            return None;
        }
    };

    match WorkItem::parse_line(&line) {
        Ok(item) => Some(item),
        Err(e) => {
            debug!("Skipping line {:?}: {}", line, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mixed_valid_and_invalid_ids() {
        let input = "333333,333333\n,\n567489,567489\nstring,322222\n\n";
        let items: Vec<WorkItem> = work_items(input.as_bytes()).collect().await;

        assert_eq!(
            items,
            vec![
                WorkItem::new("333333", "333333"),
                WorkItem::new("567489", "567489"),
            ]
        );
    }

    #[tokio::test]
    async fn test_crlf_and_missing_trailing_newline() {
        let input = "1,2\r\n3,4";
        let items: Vec<WorkItem> = work_items(input.as_bytes()).collect().await;

        assert_eq!(items, vec![WorkItem::new("1", "2"), WorkItem::new("3", "4")]);
    }

    #[tokio::test]
    async fn test_non_utf8_line_does_not_end_input() {
        let input = &b"1,1\n\xff\xfe,2\n3,3\n4,4\n"[..];
        let items: Vec<WorkItem> = work_items(input).collect().await;

        assert_eq!(
            items,
            vec![
                WorkItem::new("1", "1"),
                WorkItem::new("3", "3"),
                WorkItem::new("4", "4"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_input() {
        let items: Vec<WorkItem> = work_items(&b""[..]).collect().await;
        assert!(items.is_empty());
    }
}
