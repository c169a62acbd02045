use crate::AppState;
use anyhow::Result;
use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{info, warn};
use pulse_common::{Notice, ValueFrame, WsCommand};
use serde::Serialize;
use std::fmt::Display;
use tokio::sync::broadcast::{self, error::RecvError};

mod session;
use session::StreamSession;

pub async fn tweets_ws(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    info!("Tweets WS upgrade request");
    ws.on_upgrade(move |socket| handle_ws(state, socket))
}

async fn handle_ws(state: AppState, socket: WebSocket) {
    let session = StreamSession::new(state.args.manual_start);
    let values = state.feed.subscribe();
    info!(
        "Tweets WS connected ({} listener(s), {:?})",
        state.feed.listeners(),
        session.state()
    );

    let (ws_tx, ws_rx) = socket.split();
    if let Err(e) = pump(session, values, ws_tx, ws_rx).await {
        warn!("Tweets WS ended with error: {e:?}");
    }

    info!("Tweets WS disconnected");
}

/// Forward feed values to the socket while streaming and answer stream
/// commands coming back. Returns when either side closes.
async fn pump<Tx, Rx, E>(
    mut session: StreamSession,
    mut values: broadcast::Receiver<f64>,
    mut ws_tx: Tx,
    mut ws_rx: Rx,
) -> Result<()>
where
    Tx: Sink<WsMessage> + Unpin,
    Tx::Error: std::error::Error + Send + Sync + 'static,
    Rx: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    loop {
        tokio::select! {
            // Feed → Browser
            recv = values.recv() => match recv {
                Ok(value) => {
                    if session.is_streaming() {
                        send_json(&mut ws_tx, &ValueFrame { value }).await?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Tweets WS lagging, skipped {skipped} value(s)");
                }
                Err(RecvError::Closed) => break,
            },
            // Browser → Server
            msg = ws_rx.next() => match msg {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(reply) = handle_command(&mut session, text.as_str()) {
                        send_json(&mut ws_tx, &reply).await?;
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Tweets WS receive failed: {e}");
                    break;
                }
            },
        }
    }
    Ok(())
}

fn handle_command(session: &mut StreamSession, text: &str) -> Option<Notice> {
    match serde_json::from_str::<WsCommand>(text) {
        Ok(cmd) => {
            let reply = session.apply(cmd);
            info!("Tweets WS command {cmd:?} -> {:?}", session.state());
            Some(reply)
        }
        Err(e) => {
            warn!("Tweets WS ignoring command {text:?}: {e}");
            None
        }
    }
}

async fn send_json<Tx, T>(ws_tx: &mut Tx, frame: &T) -> Result<()>
where
    Tx: Sink<WsMessage> + Unpin,
    Tx::Error: std::error::Error + Send + Sync + 'static,
    T: Serialize,
{
    let text = serde_json::to_string(frame)?;
    ws_tx.send(WsMessage::Text(text.into())).await?;
    Ok(())
}
