use thiserror::Error;

/// Boxed error returned by a subscriber callback. Callbacks are opaque to the dispatcher so the
/// error they produce is opaque as well.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// All possible error types that may occur during notification dispatcher operations
#[derive(Error, Debug)]
pub enum NdError {
    #[error("Connection error\n{0}")]
    Connection(sqlx::Error),
    #[error("Error subscribing to channel `{channel}`\n{error}")]
    Subscription {
        /// Channel the `LISTEN`/`UNLISTEN` statement was issued against
        channel: String,
        /// Error returned by the database client
        error: sqlx::Error,
    },
    #[error("Callback error on channel `{channel}`\n{error}")]
    Callback {
        /// Channel whose callback failed
        channel: String,
        /// Error returned by the callback
        error: CallbackError,
    },
    #[error("Notification payload parse error\nNotification: `{0}`")]
    PayloadParseError(String),
    #[error("Generic error\n{0}")]
    Generic(String),
    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),
    #[error("Environment variable error\n{0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Generic [Result][std::result::Result] type where the error is always [NdError]
pub type NdResult<T> = std::result::Result<T, NdError>;
