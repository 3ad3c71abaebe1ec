use std::io::Write;
use std::path::PathBuf;

/// Errors raised while configuring a logger or emitting a record.
///
/// The display strings are what ends up after `[LOG ERROR]: ` on stderr.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("NULL Logger pointer")]
    MissingLogger,

    #[error("Invalid Minimum Log Level: {0}")]
    InvalidMinLevel(i64),

    #[error("Invalid Log Level: {0}")]
    InvalidLevel(i64),

    #[error("Invalid Color: {0}")]
    InvalidColor(u8),

    #[error("Invalid Output Stream: {0}")]
    InvalidDestination(String),

    #[error("Failed to open log file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Write a logger-internal diagnostic to stderr, never to the destination.
///
/// Stderr is the last place left to report to, so a failed write is dropped.
pub fn report(err: &LogError) {
    let _ = writeln!(std::io::stderr().lock(), "[LOG ERROR]: {}", err);
}
