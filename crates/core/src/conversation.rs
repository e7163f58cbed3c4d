//! Conversation Service
//!
//! The contract between the session state machine and whatever generates
//! counterpart replies and assessments. Production code talks to an LLM
//! through [`crate::llm_client::LlmConversationService`]; tests and local
//! development can use [`ScriptedConversationService`].

use crate::{
    assessment::AssessmentResult, error::ConversationError, message::Message, scenario::Scenario,
};
use async_openai::error::OpenAIError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Shown in place of a reply when the model returns no text.
pub const FALLBACK_REPLY: &str = "申し訳ありません。エラーが発生しました。";

/// Generates the counterpart's side of a roleplay and scores the user.
///
/// Both calls are one-shot: no streaming, no caching, no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Produces the counterpart's next utterance given the full transcript,
    /// which always ends with the user's latest message.
    async fn request_reply(
        &self,
        scenario: &Scenario,
        transcript: &[Message],
    ) -> Result<String, ConversationError>;

    /// Scores the user's side of the finished transcript.
    async fn request_assessment(
        &self,
        scenario: &Scenario,
        transcript: &[Message],
    ) -> Result<AssessmentResult, ConversationError>;
}

/// A deterministic `ConversationService` that plays back queued answers.
///
/// `None` entries simulate a failed network call. When a queue runs dry the
/// service answers with a failure as well.
#[derive(Default)]
pub struct ScriptedConversationService {
    replies: Mutex<VecDeque<Option<String>>>,
    assessments: Mutex<VecDeque<Option<AssessmentResult>>>,
}

impl ScriptedConversationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Option<&str>) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply.map(str::to_string));
        }
        self
    }

    pub fn push_assessment(&self, assessment: Option<AssessmentResult>) -> &Self {
        if let Ok(mut assessments) = self.assessments.lock() {
            assessments.push_back(assessment);
        }
        self
    }

    fn scripted_failure() -> ConversationError {
        ConversationError::Service(OpenAIError::InvalidArgument(
            "scripted failure".to_string(),
        ))
    }
}

#[async_trait]
impl ConversationService for ScriptedConversationService {
    async fn request_reply(
        &self,
        _scenario: &Scenario,
        _transcript: &[Message],
    ) -> Result<String, ConversationError> {
        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .flatten();
        next.ok_or_else(Self::scripted_failure)
    }

    async fn request_assessment(
        &self,
        _scenario: &Scenario,
        _transcript: &[Message],
    ) -> Result<AssessmentResult, ConversationError> {
        let next = self
            .assessments
            .lock()
            .ok()
            .and_then(|mut assessments| assessments.pop_front())
            .flatten();
        next.ok_or_else(Self::scripted_failure)
    }
}
