//! CommAI Core
//!
//! Everything the coaching tool knows without a web server: the scenario
//! catalog, the conversation data model, the contract for talking to the
//! external language model, and the session state machine that ties them
//! together.

pub mod assessment;
pub mod conversation;
pub mod error;
pub mod llm_client;
pub mod message;
pub mod scenario;
pub mod session;
pub mod transcript;
