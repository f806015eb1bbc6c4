//! Notifications API handlers

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use shared::Notification;
use std::convert::Infallible;
use tokio::sync::broadcast;

use crate::core::ServerState;

/// GET /api/notifications
///
/// Server-sent events stream of operator notifications.
pub async fn stream(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifier.subscribe();
    Sse::new(notification_stream(rx)).keep_alive(KeepAlive::default())
}

fn notification_stream(
    rx: broadcast::Receiver<Notification>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => match Event::default().json_data(&notification) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(_) => continue,
                },
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}
