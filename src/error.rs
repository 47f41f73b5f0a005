//! Error types shared by the external collaborators.

use thiserror::Error;

/// A failure talking to one of the external services (weather endpoint,
/// chat model, translator).
///
/// The router never propagates these; it renders them into reply text.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The service answered, but reported an error of its own.
    #[error("{0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("login failed: {0}")]
    Auth(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl ServiceError {
    /// Builds a [`ServiceError::Status`] from a non-success response, consuming its body.
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::Status {
            service,
            status,
            body,
        }
    }
}
