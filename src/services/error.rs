use http::StatusCode;
use thiserror::Error;

use crate::db::ColumnError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("error building SQL query: {0}")]
    QueryBuild(String),
    #[error("error executing query on `{table}`: {source}")]
    QueryExecution {
        table: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("error scanning column `{column}`: {source}")]
    RowMapping {
        column: String,
        #[source]
        source: ColumnError,
    },
    #[error("remote call to `{path}` failed: {source}")]
    RemoteCall {
        path: String,
        #[source]
        source: RemoteFailure,
    },
    #[error("failed to decode response from `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("deadline exceeded while waiting for {stage}")]
    DeadlineExceeded { stage: &'static str },
}

#[derive(Error, Debug)]
pub enum RemoteFailure {
    #[error("failed to make request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn execution(table: &str, source: sqlx::Error) -> Self {
        Error::QueryExecution {
            table: table.to_string(),
            source,
        }
    }

    /// Status code of a remote call that reached the master service, if any.
    pub fn remote_status(&self) -> Option<StatusCode> {
        match self {
            Error::RemoteCall {
                source: RemoteFailure::Status { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
