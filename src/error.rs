use thiserror::Error;

/// Errors raised while demultiplexing a transport stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemuxError {
    /// Not a failure: the buffer ends before the current step can finish
    #[error("Insufficient data: need at least {needed} bytes, {available} available")]
    WantMoreData { needed: usize, available: usize },

    #[error("No TS sync byte found within the first packet")]
    NotFound,

    #[error("Unsupported stream layout: {0}")]
    NotSupported(&'static str),

    #[error("Bad parameter: {0}")]
    BadParameter(&'static str),

    #[error("Demux error: {0}")]
    Unknown(&'static str),
}

impl DemuxError {
    pub fn is_want_more_data(&self) -> bool {
        matches!(self, DemuxError::WantMoreData { .. })
    }
}
