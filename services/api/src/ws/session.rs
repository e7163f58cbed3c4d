//! Manages the WebSocket connection lifecycle for one coaching session.

use super::{
    protocol::{ClientMessage, ServerMessage},
    reaction::{CallResult, PendingCall, react_to_intent, react_to_result},
};
use crate::{state::AppState, view};
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use commai_core::{conversation::ConversationService, session::Session};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// The session lives exactly as long as the connection; reloading the page
/// starts over from the scenario picker.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("ws_session", %session_id);
    async move {
        info!(chat_model = %state.config.chat_model, "New WebSocket connection.");
        if let Err(e) = run_session(socket, state).await {
            error!(error = ?e, "Session terminated with error.");
        }
        info!("Session finished.");
    }
    .instrument(span)
    .await;
}

/// The main event loop for an active WebSocket session.
///
/// Listens for user intents from the client and for results of network
/// calls running in the background, applies both to the session, and
/// pushes the re-rendered view back.
async fn run_session(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut socket_tx, mut socket_rx) = socket.split();
    let (result_tx, mut result_rx) = mpsc::channel::<CallResult>(4);
    let mut session = Session::new();

    send_view(&mut socket_tx, &state, &session).await?;

    loop {
        let reaction = tokio::select! {
            msg_result = socket_rx.next() => match msg_result {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(intent) => react_to_intent(&mut session, intent),
                        Err(e) => {
                            warn!(error = %e, "Ignoring malformed client message.");
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Client closed the connection.");
                    break;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    error!("Error receiving from client WebSocket: {:?}", e);
                    break;
                }
            },
            Some(result) = result_rx.recv() => react_to_result(&mut session, result),
        };

        if let Some(call) = reaction.call {
            spawn_call(
                state.conversation_service.clone(),
                call,
                result_tx.clone(),
            );
        }
        if reaction.rerender {
            send_view(&mut socket_tx, &state, &session).await?;
        }
        for message in reaction.messages {
            send_msg(&mut socket_tx, message).await?;
        }
    }

    Ok(())
}

/// Runs a generation call in the background and reports its result to the
/// session loop. There is no cancellation; a result that arrives after a
/// reset is discarded by the session.
fn spawn_call(
    service: Arc<dyn ConversationService>,
    call: PendingCall,
    results: mpsc::Sender<CallResult>,
) {
    tokio::spawn(
        async move {
            let result = match call {
                PendingCall::Reply(request) => {
                    let outcome = service
                        .request_reply(request.scenario, &request.transcript)
                        .await;
                    CallResult::Reply(request.ticket, outcome)
                }
                PendingCall::Assessment(request) => {
                    let outcome = service
                        .request_assessment(request.scenario, &request.transcript)
                        .await;
                    CallResult::Assessment(request.ticket, outcome)
                }
            };
            if results.send(result).await.is_err() {
                warn!("Connection closed before the call completed; dropping result.");
            }
        }
        .in_current_span(),
    );
}

async fn send_view(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
    session: &Session,
) -> Result<()> {
    let html = view::render(&state.templates, session)?;
    let view = ServerMessage::View {
        state: session.state(),
        html,
    };
    send_msg(socket_tx, view).await
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
