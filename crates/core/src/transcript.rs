//! Human-readable conversation log.
//!
//! The assessment prompt embeds the transcript as plain text, one speaker
//! label per message. `from_log` reads that format back; a line without a
//! label continues the text of the message before it.

use crate::error::TranscriptError;
use crate::message::{Message, Role};

const USER_LABEL: &str = "ユーザー: ";
const COUNTERPART_LABEL: &str = "相手: ";

fn label(role: Role) -> &'static str {
    match role {
        Role::User => USER_LABEL,
        Role::Counterpart => COUNTERPART_LABEL,
    }
}

/// Renders a transcript as a labelled log.
pub fn to_log(transcript: &[Message]) -> String {
    transcript
        .iter()
        .map(|msg| format!("{}{}", label(msg.role), msg.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses a log produced by [`to_log`].
pub fn from_log(log: &str) -> Result<Vec<Message>, TranscriptError> {
    let mut messages: Vec<Message> = Vec::new();
    if log.is_empty() {
        return Ok(messages);
    }

    for (idx, line) in log.split('\n').enumerate() {
        if let Some(text) = line.strip_prefix(USER_LABEL) {
            messages.push(Message::user(text));
        } else if let Some(text) = line.strip_prefix(COUNTERPART_LABEL) {
            messages.push(Message::counterpart(text));
        } else if let Some(last) = messages.last_mut() {
            last.text.push('\n');
            last.text.push_str(line);
        } else {
            return Err(TranscriptError::MissingRole { line: idx + 1 });
        }
    }
    Ok(messages)
}
