use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("required environment variable {0} is not set")]
    ConfigMissing(String),

    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    ConfigInvalid {
        name: String,
        value: String,
        reason: String,
    },

    #[error("failed to load config file {path}: {reason}")]
    ConfigFile { path: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to decode query response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("query returned no series")]
    EmptyResult,

    #[error("no series has tag {key}={value:?}")]
    NoMatchingSeries { key: String, value: String },

    #[error("series {0:?} has no data points")]
    EmptyInput(String),

    #[error("average is not a finite number")]
    NonFiniteAverage,

    #[error("failed to write alert file {path}: {source}")]
    SentinelWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            CheckError::ConfigMissing(_)
                | CheckError::ConfigInvalid { .. }
                | CheckError::ConfigFile { .. }
        )
    }

    /// Process exit status for this error: 2 for configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_config() {
            2
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
