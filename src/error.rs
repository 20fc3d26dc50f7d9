//! Error types for Graph API operations

use serde::Deserialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied ambiguous or missing arguments; raised before any
    /// network call is made.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A name or email lookup resolved to zero or more than one object.
    #[error("lookup for {what} matched {matched} directory object(s), expected exactly one")]
    AmbiguousLookup { what: String, matched: usize },

    /// Non-2xx response from the Graph API, carrying the parsed OData
    /// error body when the server supplied one.
    #[error("graph api error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Token endpoint failure or unusable credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Response body did not have the expected shape.
    #[error("unexpected response payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

/// OData error envelope returned by Graph on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ODataError {
    pub error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

impl Error {
    /// Build an [`Error::Api`] from a status code and the raw error body,
    /// falling back to the raw text when the body is not OData-shaped.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ODataError>(body) {
            Ok(odata) => Error::Api {
                status,
                code: odata.error.code,
                message: odata.error.message,
            },
            Err(_) => Error::Api {
                status,
                code: "unknown".to_string(),
                message: body.to_string(),
            },
        }
    }
}
