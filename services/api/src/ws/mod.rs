//! WebSocket Session Management
//!
//! Each WebSocket connection owns one coaching session. The module is split
//! into:
//!
//! - `protocol`: the JSON messages exchanged with the browser.
//! - `reaction`: how user intents and finished network calls change the
//!   session, independent of any socket.
//! - `session`: the connection lifecycle and event loop.

pub mod protocol;
mod reaction;
pub mod session;

pub use session::ws_handler;
