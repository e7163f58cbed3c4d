//! Maps user intents and completed network calls onto session transitions.
//!
//! Nothing here touches a socket or spawns a task. Each function mutates the
//! session and returns a [`Reaction`] describing what the connection loop
//! has to do next.

use super::protocol::{ClientMessage, ServerMessage};
use commai_core::{
    assessment::AssessmentResult,
    error::{ConversationError, SessionError},
    session::{
        AssessmentRequest, AssessmentTicket, Completion, EndOutcome, ReplyRequest, ReplyTicket,
        Session,
    },
};
use tracing::{info, warn};

pub(crate) const REPLY_FAILED: &str = "エラーが発生しました。もう一度お試しください。";
pub(crate) const ASSESSMENT_FAILED: &str = "評価中にエラーが発生しました。";
pub(crate) const CONFIRM_SHORT_END: &str = "まだ会話が少ないです。終了して評価しますか？";
pub(crate) const UNKNOWN_SCENARIO: &str = "シナリオが見つかりませんでした。もう一度選択してください。";

/// A network call the connection loop must start.
#[derive(Debug)]
pub(crate) enum PendingCall {
    Reply(ReplyRequest),
    Assessment(AssessmentRequest),
}

/// A finished network call on its way back to the connection loop.
#[derive(Debug)]
pub(crate) enum CallResult {
    Reply(ReplyTicket, Result<String, ConversationError>),
    Assessment(AssessmentTicket, Result<AssessmentResult, ConversationError>),
}

#[derive(Debug, Default)]
pub(crate) struct Reaction {
    /// Send the re-rendered view before `messages`.
    pub rerender: bool,
    pub messages: Vec<ServerMessage>,
    pub call: Option<PendingCall>,
}

impl Reaction {
    fn rerender() -> Self {
        Self {
            rerender: true,
            ..Self::default()
        }
    }

    fn with_notice(mut self, message: &str) -> Self {
        self.messages.push(ServerMessage::Notice {
            message: message.to_string(),
        });
        self
    }

    fn with_call(mut self, call: PendingCall) -> Self {
        self.call = Some(call);
        self
    }
}

pub(crate) fn react_to_intent(session: &mut Session, intent: ClientMessage) -> Reaction {
    match intent {
        ClientMessage::SelectScenario { scenario_id } => {
            match session.select_scenario(&scenario_id) {
                Ok(()) => Reaction::rerender(),
                Err(SessionError::UnknownScenario(id)) => {
                    warn!(scenario_id = %id, "Unknown scenario selected.");
                    Reaction::rerender().with_notice(UNKNOWN_SCENARIO)
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring scenario selection.");
                    Reaction::rerender()
                }
            }
        }
        ClientMessage::SendMessage { text } => match session.begin_reply(&text) {
            Ok(request) => Reaction::rerender().with_call(PendingCall::Reply(request)),
            // The client's view is out of date; show the current one.
            Err(e @ SessionError::InvalidTransition { .. }) => {
                warn!(error = %e, "Rejected message.");
                Reaction::rerender()
            }
            // Nothing changed, and re-rendering would clear the user's draft.
            Err(e) => {
                warn!(error = %e, "Rejected message.");
                Reaction::default()
            }
        },
        ClientMessage::EndSession { confirmed } => match session.request_end(confirmed) {
            Ok(EndOutcome::NeedsConfirmation) => Reaction {
                messages: vec![ServerMessage::ConfirmEnd {
                    message: CONFIRM_SHORT_END.to_string(),
                }],
                ..Reaction::default()
            },
            Ok(EndOutcome::Assess(request)) => {
                Reaction::rerender().with_call(PendingCall::Assessment(request))
            }
            Err(e) => {
                warn!(error = %e, "Rejected end of session.");
                Reaction::rerender()
            }
        },
        ClientMessage::Reset => {
            session.reset();
            Reaction::rerender()
        }
    }
}

pub(crate) fn react_to_result(session: &mut Session, result: CallResult) -> Reaction {
    let (completion, failure_notice) = match result {
        CallResult::Reply(ticket, outcome) => (session.complete_reply(ticket, outcome), REPLY_FAILED),
        CallResult::Assessment(ticket, outcome) => (
            session.complete_assessment(ticket, outcome),
            ASSESSMENT_FAILED,
        ),
    };
    match completion {
        Ok(Completion::Applied) => Reaction::rerender(),
        Ok(Completion::Stale) => {
            info!("Dropped a result that no longer applies.");
            Reaction::default()
        }
        Err(_) => Reaction::rerender().with_notice(failure_notice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::OpenAIError;
    use commai_core::{
        assessment::Scores,
        message::Role,
        session::SessionState,
    };

    fn service_error() -> ConversationError {
        ConversationError::Service(OpenAIError::InvalidArgument("offline".to_string()))
    }

    fn assessment() -> AssessmentResult {
        AssessmentResult {
            scores: Scores {
                empathy: 50.0,
                logic: 50.0,
                clarity: 50.0,
                confidence: 50.0,
                persuasion: 50.0,
            },
            overall_feedback: "ふつう".to_string(),
            strengths: vec!["丁寧".to_string()],
            improvements: vec!["短い".to_string()],
            advice: "もう少し話しましょう".to_string(),
        }
    }

    fn select(session: &mut Session, id: &str) -> Reaction {
        react_to_intent(
            session,
            ClientMessage::SelectScenario {
                scenario_id: id.to_string(),
            },
        )
    }

    fn send(session: &mut Session, text: &str) -> Reaction {
        react_to_intent(
            session,
            ClientMessage::SendMessage {
                text: text.to_string(),
            },
        )
    }

    fn end(session: &mut Session, confirmed: bool) -> Reaction {
        react_to_intent(session, ClientMessage::EndSession { confirmed })
    }

    fn notice(message: &str) -> ServerMessage {
        ServerMessage::Notice {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_unknown_scenario_re_presents_picker_with_notice() {
        let mut session = Session::new();
        let reaction = select(&mut session, "karaoke");
        assert!(reaction.rerender);
        assert_eq!(reaction.messages, vec![notice(UNKNOWN_SCENARIO)]);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_send_starts_a_reply_call_and_rejects_a_second() {
        let mut session = Session::new();
        select(&mut session, "interview");

        let reaction = send(&mut session, "よろしくお願いします");
        assert!(matches!(reaction.call, Some(PendingCall::Reply(_))));
        assert!(session.is_awaiting_reply());

        let reaction = send(&mut session, "聞こえますか");
        assert!(reaction.call.is_none());
        assert!(!reaction.rerender);
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_blank_send_leaves_view_alone() {
        let mut session = Session::new();
        select(&mut session, "interview");
        let reaction = send(&mut session, "  ");
        assert!(reaction.call.is_none());
        assert!(!reaction.rerender);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_send_outside_chatting_re_renders_current_view() {
        let mut session = Session::new();
        let reaction = send(&mut session, "こんにちは");
        assert!(reaction.call.is_none());
        assert!(reaction.rerender);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_failed_reply_keeps_user_message_and_notifies() {
        let mut session = Session::new();
        select(&mut session, "interview");
        let Some(PendingCall::Reply(request)) = send(&mut session, "よろしく").call else {
            panic!("expected a reply call");
        };

        let reaction = react_to_result(
            &mut session,
            CallResult::Reply(request.ticket, Err(service_error())),
        );
        assert!(reaction.rerender);
        assert_eq!(reaction.messages, vec![notice(REPLY_FAILED)]);
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[1].role, Role::User);
        assert!(!session.is_awaiting_reply());
    }

    #[test]
    fn test_short_end_asks_for_confirmation_then_assesses() {
        let mut session = Session::new();
        select(&mut session, "networking");

        let reaction = end(&mut session, false);
        assert!(reaction.call.is_none());
        assert_eq!(
            reaction.messages,
            vec![ServerMessage::ConfirmEnd {
                message: CONFIRM_SHORT_END.to_string()
            }]
        );
        assert_eq!(session.state(), SessionState::Chatting);

        let reaction = end(&mut session, true);
        assert!(matches!(reaction.call, Some(PendingCall::Assessment(_))));
        assert_eq!(session.state(), SessionState::Assessing);
    }

    #[test]
    fn test_end_while_awaiting_reply_assesses_and_drops_the_reply() {
        let mut session = Session::new();
        select(&mut session, "interview");
        let Some(PendingCall::Reply(reply)) = send(&mut session, "よろしく").call else {
            panic!("expected a reply call");
        };

        let reaction = end(&mut session, true);
        assert!(matches!(reaction.call, Some(PendingCall::Assessment(_))));
        assert_eq!(session.state(), SessionState::Assessing);

        let reaction = react_to_result(
            &mut session,
            CallResult::Reply(reply.ticket, Ok("遅い返事".to_string())),
        );
        assert!(!reaction.rerender);
        assert!(reaction.messages.is_empty());
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_assessment_success_and_failure() {
        let mut session = Session::new();
        select(&mut session, "interview");
        let Some(PendingCall::Assessment(request)) = end(&mut session, true).call else {
            panic!("expected an assessment call");
        };
        let reaction = react_to_result(
            &mut session,
            CallResult::Assessment(
                request.ticket,
                Err(ConversationError::MalformedAssessment("bad".to_string())),
            ),
        );
        assert_eq!(reaction.messages, vec![notice(ASSESSMENT_FAILED)]);
        assert_eq!(session.state(), SessionState::Chatting);
        assert_eq!(session.transcript().len(), 1);

        let Some(PendingCall::Assessment(request)) = end(&mut session, true).call else {
            panic!("expected an assessment call");
        };
        let reaction = react_to_result(
            &mut session,
            CallResult::Assessment(request.ticket, Ok(assessment())),
        );
        assert!(reaction.rerender);
        assert!(reaction.messages.is_empty());
        assert_eq!(session.state(), SessionState::Result);
    }

    #[test]
    fn test_result_after_reset_is_dropped_silently() {
        let mut session = Session::new();
        select(&mut session, "interview");
        let Some(PendingCall::Reply(request)) = send(&mut session, "よろしく").call else {
            panic!("expected a reply call");
        };
        react_to_intent(&mut session, ClientMessage::Reset);

        let reaction = react_to_result(
            &mut session,
            CallResult::Reply(request.ticket, Ok("遅い返事".to_string())),
        );
        assert!(!reaction.rerender);
        assert!(reaction.messages.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }
}
