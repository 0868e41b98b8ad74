//! Structured session logging utilities.
//!
//! Provides consistent, structured logging for reconciliation sessions with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

use editfx_models::VideoId;

/// Session logger for structured logging with consistent formatting.
///
/// Every line carries the session id and the dataset being reconciled.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    dataset: String,
}

impl SessionLogger {
    /// Create a logger with a fresh session id.
    pub fn new(dataset: &str) -> Self {
        Self::from_string(&Uuid::new_v4().to_string(), dataset)
    }

    /// Create a session logger from an existing session id.
    pub fn from_string(session_id: &str, dataset: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    /// Log the start of a review session.
    pub fn log_start(&self, queued: usize) {
        info!(
            session_id = %self.session_id,
            dataset = %self.dataset,
            queued,
            "Review session started"
        );
    }

    /// Log what happened to one queued record.
    pub fn log_record(&self, video_id: &VideoId, message: &str) {
        info!(
            session_id = %self.session_id,
            video_id = %video_id,
            "Record: {}", message
        );
    }

    /// Log a warning about one record.
    pub fn log_warning(&self, video_id: &VideoId, message: &str) {
        warn!(
            session_id = %self.session_id,
            video_id = %video_id,
            "Record warning: {}", message
        );
    }

    /// Log an error while reconciling one record.
    pub fn log_error(&self, video_id: &VideoId, message: &str) {
        error!(
            session_id = %self.session_id,
            video_id = %video_id,
            "Record error: {}", message
        );
    }

    /// Log the end of a review session.
    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            dataset = %self.dataset,
            "Review session finished: {}", message
        );
    }

    /// Get the session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the dataset being reconciled.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Span covering one record of the queue.
    pub fn create_span(&self, video_id: &VideoId, position: usize) -> Span {
        tracing::info_span!(
            "review_record",
            session_id = %self.session_id,
            video_id = %video_id,
            position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_logger_creation() {
        let logger = SessionLogger::new("filtered/sports_filtered.csv");
        assert!(Uuid::parse_str(logger.session_id()).is_ok());
        assert_eq!(logger.dataset(), "filtered/sports_filtered.csv");
    }

    #[test]
    fn test_session_logger_from_string() {
        let logger = SessionLogger::from_string("session-1", "data.csv");
        assert_eq!(logger.session_id(), "session-1");
    }
}
