//! Live feed of job log rows.

use tokio::sync::broadcast;

use crate::model::ExtractionLog;

/// Fans out every job log entry as it is written.
#[derive(Clone)]
pub struct LogBroadcaster {
    sender: broadcast::Sender<ExtractionLog>,
}

impl LogBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, entry: ExtractionLog) {
        // Dropped when nobody is listening; the row is already stored.
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExtractionLog> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogLevel;

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = LogBroadcaster::new(10);
        let mut receiver = broadcaster.subscribe();

        broadcaster.send(
            ExtractionLog::new("job-1", LogLevel::Warning, "Retry failed for question Q3")
                .with_details("Question still failing after retry attempt"),
        );

        let entry = receiver.try_recv().unwrap();
        assert_eq!(entry.job_id, "job-1");
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(
            entry.details.as_deref(),
            Some("Question still failing after retry attempt")
        );
    }

    #[test]
    fn test_each_subscriber_sees_every_entry() {
        let broadcaster = LogBroadcaster::default();
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        broadcaster.send(ExtractionLog::new("job-1", LogLevel::Info, "one"));

        assert_eq!(a.try_recv().unwrap().message, "one");
        assert_eq!(b.try_recv().unwrap().message, "one");
    }
}
