use std::{convert::Infallible, fmt::Display, time::Duration};

use axum::{
    extract::ws::{Message, WebSocket},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::sse::ServerEvent,
    error::ServiceError,
    game::GameSnapshot,
    services::session_service::collect_terminated,
    state::{EVENT_GAME_STATE, SessionId, SharedState},
};

/// A viewer subscribed to a game hub, together with the state it starts from.
pub struct ViewerSubscription {
    /// Game being watched.
    pub game_id: SessionId,
    /// Receives every snapshot published after the subscription.
    pub receiver: broadcast::Receiver<ServerEvent>,
    /// State of the game at subscription time.
    pub initial: GameSnapshot,
}

/// Subscribe to the hub of game `id`.
///
/// The hub is joined before reading the snapshot, so no update can fall in between.
pub async fn attach(
    state: &SharedState,
    id: SessionId,
) -> Result<ViewerSubscription, ServiceError> {
    collect_terminated(state).await;
    let receiver = state.hubs().attach(id)?;
    let initial = state.sessions().get(id).await?;
    debug!(
        game_id = id,
        viewers = state.hubs().viewer_count(id),
        "viewer attached"
    );
    Ok(ViewerSubscription {
        game_id: id,
        receiver,
        initial,
    })
}

/// Serialize a payload into a WebSocket text frame, logging serialization failures.
fn to_text_message<T>(value: &T) -> Option<Message>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    match serde_json::to_string(value) {
        Ok(payload) => Some(Message::Text(payload.into())),
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{value:?}`");
            None
        }
    }
}

/// Stream a game to a WebSocket viewer until either side goes away.
pub async fn handle_socket(subscription: ViewerSubscription, socket: WebSocket) {
    let (sender, inbound) = socket.split();
    stream_to_viewer(subscription, sender, inbound).await;
}

/// Drive one viewer connection: initial snapshot, then live updates and keep-alives.
async fn stream_to_viewer<S, R>(subscription: ViewerSubscription, mut sender: S, mut inbound: R)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let ViewerSubscription {
        game_id,
        mut receiver,
        initial,
    } = subscription;
    let viewer_id = Uuid::new_v4();
    info!(game_id, viewer = %viewer_id, "viewer connected");

    if let Some(message) = to_text_message(&initial) {
        if sender.send(message).await.is_err() {
            info!(game_id, viewer = %viewer_id, "viewer left before the first snapshot");
            return;
        }
    }

    loop {
        tokio::select! {
            update = receiver.recv() => match update {
                Ok(event) => {
                    if sender.send(Message::Text(event.data.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        game_id,
                        viewer = %viewer_id,
                        skipped,
                        "viewer lagging; dropped oldest snapshots"
                    );
                }
                Err(RecvError::Closed) => {
                    info!(game_id, viewer = %viewer_id, "game ended; closing viewer");
                    if let Err(err) = sender.send(Message::Close(None)).await {
                        debug!(
                            game_id,
                            viewer = %viewer_id,
                            error = %err,
                            "close frame not delivered"
                        );
                    }
                    break;
                }
            },
            message = inbound.next() => match message {
                Some(Ok(Message::Ping(payload))) => {
                    if sender.send(Message::Pong(payload)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(game_id, viewer = %viewer_id, error = %err, "websocket error");
                    break;
                }
            },
        }
    }

    info!(game_id, viewer = %viewer_id, "viewer disconnected");
}

/// Convert a subscription into an SSE response, starting with the current snapshot.
pub fn to_sse_stream(
    subscription: ViewerSubscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let ViewerSubscription {
        game_id,
        mut receiver,
        initial,
    } = subscription;
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        match ServerEvent::json(Some(EVENT_GAME_STATE.to_string()), &initial) {
            Ok(event) => {
                if tx.send(Ok(to_sse_event(event))).await.is_err() {
                    return;
                }
            }
            Err(err) => warn!(game_id, error = %err, "failed to serialize game snapshot"),
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_sse_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged snapshots but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        info!(game_id, "SSE viewer disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_sse_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;
    use futures::channel::mpsc as channel;
    use tokio::time::timeout;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    type Inbound = channel::UnboundedReceiver<Result<Message, axum::Error>>;

    async fn watch_new_game(state: &SharedState) -> ViewerSubscription {
        let (id, _) = state.sessions().create("301").await.unwrap();
        attach(state, id).await.unwrap()
    }

    #[tokio::test]
    async fn attach_returns_current_state_and_live_updates() {
        let state = AppState::new(AppConfig::default());
        state.boards().heartbeat("A");
        let (id, _) = state.sessions().create("301").await.unwrap();

        let mut subscription = attach(&state, id).await.unwrap();
        assert!(subscription.initial.players.is_empty());
        assert_eq!(state.hubs().viewer_count(id), 1);

        state.sessions().bind_player(id, "A", "Alice").await.unwrap();
        let event = subscription.receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_GAME_STATE));
    }

    #[tokio::test]
    async fn attach_to_unknown_game_fails() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            attach(&state, 42).await,
            Err(ServiceError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn viewer_loop_stops_once_pong_cannot_be_sent() {
        let state = AppState::new(AppConfig::default());
        let subscription = watch_new_game(&state).await;
        let (out_tx, mut out_rx) = channel::channel::<Message>(8);
        let (in_tx, in_rx): (_, Inbound) = channel::unbounded();
        let task = tokio::spawn(stream_to_viewer(subscription, out_tx, in_rx));

        assert!(matches!(out_rx.next().await, Some(Message::Text(_))));
        drop(out_rx);
        in_tx
            .unbounded_send(Ok(Message::Ping(Bytes::from_static(b"ping"))))
            .unwrap();

        timeout(Duration::from_secs(1), task)
            .await
            .expect("viewer loop should stop on a dead socket")
            .unwrap();
        drop(in_tx);
    }

    #[tokio::test]
    async fn ended_game_sends_a_close_frame() {
        let state = AppState::new(AppConfig::default());
        let subscription = watch_new_game(&state).await;
        let id = subscription.game_id;
        let (out_tx, mut out_rx) = channel::channel::<Message>(8);
        let (_in_tx, in_rx): (_, Inbound) = channel::unbounded();
        let task = tokio::spawn(stream_to_viewer(subscription, out_tx, in_rx));

        assert!(matches!(out_rx.next().await, Some(Message::Text(_))));
        assert!(state.hubs().close(id));
        assert!(matches!(out_rx.next().await, Some(Message::Close(None))));
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }
}
