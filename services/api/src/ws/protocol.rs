//! Defines the WebSocket message protocol between the browser client and the API server.

use commai_core::session::SessionState;
use serde::{Deserialize, Serialize};

/// User intents sent from the client (browser) to the server.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts a roleplay with the given scenario.
    SelectScenario { scenario_id: String },
    /// A line typed by the user.
    SendMessage { text: String },
    /// Ends the roleplay and requests an assessment. `confirmed` is set when
    /// the user has already agreed to end a short conversation.
    EndSession {
        #[serde(default)]
        confirmed: bool,
    },
    /// Discards the session and returns to the scenario picker.
    Reset,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The freshly rendered view for the current session state. `state`
    /// lets the page shell adjust the parts it owns, like the header.
    View { state: SessionState, html: String },
    /// A blocking notice the user must acknowledge.
    Notice { message: String },
    /// Asks the user to confirm ending a short conversation.
    ConfirmEnd { message: String },
}
