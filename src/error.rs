use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Prediction endpoint failed; the message is shown to the user as-is
    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unsupported playback speed {speed}x (allowed: {allowed:?})")]
    UnsupportedSpeed { speed: f64, allowed: Vec<f64> },

    #[error("Unknown equipment profile: {0}")]
    UnknownEquipment(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Dataset(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Dataset(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Prediction(err.to_string())
    }
}
