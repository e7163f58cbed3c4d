//! Session State Machine
//!
//! A `Session` is the single owner of everything one user's roleplay has
//! produced: the chosen scenario, the transcript, and the final assessment.
//! It moves through four states:
//!
//! ```text
//! Idle --select--> Chatting --end--> Assessing --ok--> Result
//!                   ^    |              |
//!                   +----+  send        +--err--> Chatting
//! ```
//!
//! and `reset` returns any state to `Idle`.
//!
//! Transitions that wait on the network are split in two. A `begin_*` call
//! validates the intent, updates the state, and hands back a request value
//! carrying everything the network call needs. The matching `complete_*`
//! call applies the outcome. The owner therefore never holds the session
//! across an `.await`, and can keep handling intents (rejecting a second
//! send, or resetting) while a call is in flight.

use crate::{
    assessment::AssessmentResult,
    conversation::ConversationService,
    error::{ConversationError, SessionError},
    message::Message,
    scenario::{self, Scenario},
};
use serde::Serialize;
use tracing::{error, info, warn};

/// Ending a session with fewer messages than this needs explicit confirmation.
pub const MIN_MESSAGES_WITHOUT_CONFIRMATION: usize = 3;

/// The four externally visible states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Chatting,
    Assessing,
    Result,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Chatting => "chatting",
            SessionState::Assessing => "assessing",
            SessionState::Result => "showing results",
        }
    }
}

/// Sub-state of `Chatting`: at most one reply request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyPhase {
    Ready,
    AwaitingReply,
}

#[derive(Debug, Clone)]
struct Conversation {
    scenario: &'static Scenario,
    transcript: Vec<Message>,
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    Chatting {
        conversation: Conversation,
        phase: ReplyPhase,
    },
    Assessing {
        conversation: Conversation,
    },
    Result {
        conversation: Conversation,
        assessment: AssessmentResult,
    },
}

/// Identifies the conversation a pending reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    epoch: u64,
}

/// Identifies the conversation a pending assessment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentTicket {
    epoch: u64,
}

/// Everything needed to ask for the counterpart's next reply.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub ticket: ReplyTicket,
    pub scenario: &'static Scenario,
    pub transcript: Vec<Message>,
}

/// Everything needed to ask for the final assessment.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub ticket: AssessmentTicket,
    pub scenario: &'static Scenario,
    pub transcript: Vec<Message>,
}

/// What happened when the user asked to end the session.
#[derive(Debug)]
pub enum EndOutcome {
    /// The conversation is short; ask the user before assessing. Nothing changed.
    NeedsConfirmation,
    /// The session is now `Assessing`; run the request and complete it.
    Assess(AssessmentRequest),
}

/// Whether a completed network call still applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The session was reset or restarted while the call was in flight.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Session {
    stage: Stage,
    epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            epoch: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.stage {
            Stage::Idle => SessionState::Idle,
            Stage::Chatting { .. } => SessionState::Chatting,
            Stage::Assessing { .. } => SessionState::Assessing,
            Stage::Result { .. } => SessionState::Result,
        }
    }

    fn conversation(&self) -> Option<&Conversation> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Chatting { conversation, .. }
            | Stage::Assessing { conversation }
            | Stage::Result { conversation, .. } => Some(conversation),
        }
    }

    pub fn scenario(&self) -> Option<&'static Scenario> {
        self.conversation().map(|c| c.scenario)
    }

    pub fn transcript(&self) -> &[Message] {
        self.conversation()
            .map(|c| c.transcript.as_slice())
            .unwrap_or_default()
    }

    pub fn assessment(&self) -> Option<&AssessmentResult> {
        match &self.stage {
            Stage::Result { assessment, .. } => Some(assessment),
            _ => None,
        }
    }

    /// True while a reply request is outstanding (the typing indicator).
    pub fn is_awaiting_reply(&self) -> bool {
        matches!(
            self.stage,
            Stage::Chatting {
                phase: ReplyPhase::AwaitingReply,
                ..
            }
        )
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state().name(),
        }
    }

    /// Starts a roleplay. Only valid from `Idle`.
    pub fn select_scenario(&mut self, scenario_id: &str) -> Result<(), SessionError> {
        if self.state() != SessionState::Idle {
            return Err(self.invalid("select a scenario"));
        }
        let scenario = scenario::find(scenario_id)
            .ok_or_else(|| SessionError::UnknownScenario(scenario_id.to_string()))?;

        self.epoch += 1;
        self.stage = Stage::Chatting {
            conversation: Conversation {
                scenario,
                transcript: vec![Message::counterpart(scenario.greeting())],
            },
            phase: ReplyPhase::Ready,
        };
        info!(scenario = scenario.id, "Session started");
        Ok(())
    }

    /// Records the user's message and marks a reply as outstanding.
    pub fn begin_reply(&mut self, text: &str) -> Result<ReplyRequest, SessionError> {
        let epoch = self.epoch;
        let state = self.state();
        let Stage::Chatting {
            conversation,
            phase,
        } = &mut self.stage
        else {
            return Err(SessionError::InvalidTransition {
                action: "send a message",
                state: state.name(),
            });
        };
        if *phase == ReplyPhase::AwaitingReply {
            return Err(SessionError::ReplyInFlight);
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        conversation.transcript.push(Message::user(text));
        *phase = ReplyPhase::AwaitingReply;
        Ok(ReplyRequest {
            ticket: ReplyTicket { epoch },
            scenario: conversation.scenario,
            transcript: conversation.transcript.clone(),
        })
    }

    /// Applies the outcome of a reply request.
    ///
    /// On success the counterpart's message is appended. On failure only
    /// the user's message remains and the error is handed back so the
    /// caller can tell the user. Either way the session is ready for the
    /// next send.
    pub fn complete_reply(
        &mut self,
        ticket: ReplyTicket,
        outcome: Result<String, ConversationError>,
    ) -> Result<Completion, ConversationError> {
        let current = self.epoch;
        let Stage::Chatting {
            conversation,
            phase,
        } = &mut self.stage
        else {
            warn!("Discarding reply for a session that is no longer chatting.");
            return Ok(Completion::Stale);
        };
        if ticket.epoch != current || *phase != ReplyPhase::AwaitingReply {
            warn!("Discarding reply from a previous session.");
            return Ok(Completion::Stale);
        }

        *phase = ReplyPhase::Ready;
        match outcome {
            Ok(text) => {
                conversation.transcript.push(Message::counterpart(text));
                Ok(Completion::Applied)
            }
            Err(e) => {
                error!(error = %e, "Reply request failed");
                Err(e)
            }
        }
    }

    /// Handles the user's request to end the roleplay.
    ///
    /// Short conversations need `confirmed` before they are assessed. An
    /// outstanding reply does not block ending: the transcript is assessed
    /// as it stands and the late reply is discarded.
    pub fn request_end(&mut self, confirmed: bool) -> Result<EndOutcome, SessionError> {
        let conversation = match &self.stage {
            Stage::Chatting { conversation, .. } => conversation.clone(),
            _ => return Err(self.invalid("end the session")),
        };

        if conversation.transcript.len() < MIN_MESSAGES_WITHOUT_CONFIRMATION && !confirmed {
            return Ok(EndOutcome::NeedsConfirmation);
        }

        // Replies requested before this point must not land in a later chat,
        // even if the assessment fails and the session returns to Chatting.
        self.epoch += 1;
        let epoch = self.epoch;
        let request = AssessmentRequest {
            ticket: AssessmentTicket { epoch },
            scenario: conversation.scenario,
            transcript: conversation.transcript.clone(),
        };
        info!(
            scenario = conversation.scenario.id,
            messages = conversation.transcript.len(),
            "Assessing session"
        );
        self.stage = Stage::Assessing { conversation };
        Ok(EndOutcome::Assess(request))
    }

    /// Applies the outcome of an assessment request.
    ///
    /// Success moves to `Result`. Failure returns to `Chatting` with the
    /// transcript untouched so the user can try ending again.
    pub fn complete_assessment(
        &mut self,
        ticket: AssessmentTicket,
        outcome: Result<AssessmentResult, ConversationError>,
    ) -> Result<Completion, ConversationError> {
        if ticket.epoch != self.epoch || self.state() != SessionState::Assessing {
            warn!("Discarding assessment for a session that is no longer assessing.");
            return Ok(Completion::Stale);
        }
        let Stage::Assessing { conversation } =
            std::mem::replace(&mut self.stage, Stage::Idle)
        else {
            return Ok(Completion::Stale);
        };

        match outcome {
            Ok(assessment) => {
                self.stage = Stage::Result {
                    conversation,
                    assessment,
                };
                Ok(Completion::Applied)
            }
            Err(e) => {
                error!(error = %e, "Assessment request failed");
                self.stage = Stage::Chatting {
                    conversation,
                    phase: ReplyPhase::Ready,
                };
                Err(e)
            }
        }
    }

    /// Discards scenario, transcript and assessment from any state.
    ///
    /// Calls still in flight become stale and their results are ignored.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.stage = Stage::Idle;
        info!("Session reset");
    }

    /// Sends a message and waits for the reply.
    pub async fn send_message(
        &mut self,
        service: &dyn ConversationService,
        text: &str,
    ) -> Result<(), SessionError> {
        let request = self.begin_reply(text)?;
        let outcome = service
            .request_reply(request.scenario, &request.transcript)
            .await;
        self.complete_reply(request.ticket, outcome)?;
        Ok(())
    }

    /// Ends the session and waits for the assessment.
    ///
    /// Returns `None` when the conversation is too short and `confirmed`
    /// was not given; the session is left unchanged in that case.
    pub async fn end_session(
        &mut self,
        service: &dyn ConversationService,
        confirmed: bool,
    ) -> Result<Option<&AssessmentResult>, SessionError> {
        let request = match self.request_end(confirmed)? {
            EndOutcome::NeedsConfirmation => return Ok(None),
            EndOutcome::Assess(request) => request,
        };
        let outcome = service
            .request_assessment(request.scenario, &request.transcript)
            .await;
        self.complete_assessment(request.ticket, outcome)?;
        Ok(self.assessment())
    }
}
