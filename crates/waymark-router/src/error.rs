use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("saved history is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("saved history has no entries")]
    Empty,
    #[error("saved history cursor {cursor} is out of range for {len} entries")]
    CursorOutOfRange { cursor: usize, len: usize },
}
