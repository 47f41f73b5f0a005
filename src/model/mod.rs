//! Client for the hosted chat model.

use async_trait::async_trait;
use std::fmt;

use crate::error::ServiceError;

mod events;
mod huggingchat;

pub use events::{ChatEvent, collect_answer, ndjson_to_events};
pub use huggingchat::{DEFAULT_HUGGINGCHAT_URL, HuggingChatClient};

/// A hosted conversational model answering one prompt at a time.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Login credentials for the chat model, held only for the session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = Credentials::new("farmer@example.com", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("farmer@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
