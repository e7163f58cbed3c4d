use serde::{Deserialize, Serialize};
use std::fmt;

/// Who said a line in the conversation.
///
/// The serialized names follow the generation service's vocabulary, where
/// the simulated counterpart speaks as `"model"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Counterpart,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Counterpart => write!(f, "model"),
        }
    }
}

/// One utterance in a transcript. A transcript is simply `Vec<Message>` in
/// conversational order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn counterpart(text: impl Into<String>) -> Self {
        Self {
            role: Role::Counterpart,
            text: text.into(),
        }
    }
}
