use chrono::NaiveDateTime;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifierError>;

/// Faults raised by the notifier. Platform failures are passed through as-is.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("platform service failed: {0}")]
    Platform(String),

    #[error("no launch entry point registered for package `{package}`")]
    LaunchTargetUnavailable { package: String },

    #[error("notification payload could not be encoded or decoded: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("trigger `{action}` carried no notification payload")]
    MissingPayload { action: String },

    #[error("local time {0} does not exist in the system time zone")]
    NonexistentLocalTime(NaiveDateTime),

    #[error("notification adapter built without a platform")]
    MissingPlatform,

    #[error("invalid config value for `{key}`: {message}")]
    Config { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
