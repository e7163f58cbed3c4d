//! CommAI API Library Crate
//!
//! This library contains everything the web service needs beyond the core
//! session logic: configuration, shared state, REST handlers, HTML views,
//! the radar chart, WebSocket session handling, and routing. The `api`
//! binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod radar;
pub mod router;
pub mod state;
pub mod view;
pub mod ws;
