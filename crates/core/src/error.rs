//! Error types shared across the core crate.

use async_openai::error::OpenAIError;

/// Failures from the external generation service.
///
/// Both variants are terminal for the request that produced them; nothing
/// in this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("generation service request failed: {0}")]
    Service(#[from] OpenAIError),
    #[error("assessment payload did not match the expected shape: {0}")]
    MalformedAssessment(String),
}

/// A user intent that the session cannot accept in its current state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("message text is empty")]
    EmptyMessage,
    #[error("a reply is still being generated")]
    ReplyInFlight,
    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("log line {line} does not start with a speaker label")]
    MissingRole { line: usize },
}
