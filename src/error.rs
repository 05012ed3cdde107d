use thiserror::Error;

#[derive(Debug, Error)]
pub enum LandsatError {
    #[error("Unexpected processing level: {0:?}")]
    UnexpectedLevel(String),

    #[error("Invalid acquisition time {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Invalid cloud cover {value:?}: {reason}")]
    CloudCover { value: String, reason: String },

    #[error("Malformed scene record: expected at least 11 fields, found {found}")]
    ShortRecord { found: usize },

    #[error("Invalid sun elevation {value:?}")]
    SunElevation { value: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid dates: {0}")]
    InvalidDates(String),

    #[error("Thread error: {0}")]
    Thread(String),
}

impl LandsatError {
    /// Whether trying the same operation again could succeed. Parse failures on catalog rows or
    /// metadata content give the same answer every time.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            LandsatError::UnexpectedLevel(_)
                | LandsatError::Timestamp { .. }
                | LandsatError::CloudCover { .. }
                | LandsatError::ShortRecord { .. }
                | LandsatError::SunElevation { .. }
                | LandsatError::InvalidDates(_)
        )
    }
}
