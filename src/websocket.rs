//! Connection handler and session operations.
//!
//! A connection's read loop is serial; each frame it reads is dispatched to
//! its own spawned task, so messages from one socket do not serialize
//! against each other — ordering between two messages from the same socket
//! is not preserved.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broadcast::broadcast_to_room;
use crate::connection::Connection;
use crate::error::MessageError;
use crate::message::{
    parse_inbound, ConnectRequest, InboundMessage, NewDataRequest, OutboundMessage,
    SetLeaderRequest,
};
use crate::room::NO_LEADER;
use crate::state::AppState;
use crate::store::KeyedStore;
use crate::user::User;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let conn = Arc::new(Connection::new(sender));
    info!(connection_id = %conn.id, "connection upgraded successfully");

    while let Some(frame) = receiver.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(err) => {
                warn!(connection_id = %conn.id, %err, "error reading frame, closing connection");
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let state = state.clone();
                let conn = conn.clone();
                tokio::spawn(async move { message_handler(state, conn, text).await });
            }
            Message::Ping(data) => {
                let _ = conn.send_raw(Message::Pong(data)).await;
            }
            Message::Close(_) => break,
            Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    unregister_user(&state, conn.id).await;
    info!(connection_id = %conn.id, "connection closed");
}

/// Parse and dispatch one inbound frame. Any failure — malformed JSON, an
/// unrecognised event, a failed auth gate, or an unmet precondition — causes
/// the frame to be dropped silently, without an error reply to the client.
async fn message_handler(state: AppState, conn: Arc<Connection>, raw: String) {
    let message = match parse_inbound(&raw) {
        Ok(message) => message,
        Err(err) => {
            debug!(%err, "dropping malformed inbound message");
            return;
        }
    };

    let result = match message {
        InboundMessage::Connect(req) => handle_connect(&state, conn, req).await,
        InboundMessage::SetLeader(req) => handle_set_leader(&state, req).await,
        InboundMessage::NewData(req) => handle_new_data(&state, req).await,
    };

    if let Err(err) = result {
        debug!(%err, "dropping inbound message after handler error");
    }
}

async fn handle_connect(
    state: &AppState,
    conn: Arc<Connection>,
    request: ConnectRequest,
) -> Result<(), MessageError> {
    let user_id = state
        .auth_gate
        .cache_or_validate(&request.jwt, &request.board_id)
        .await?;

    if state.users.get(&user_id).is_some() {
        // Already registered under this identity: a silent no-op (invariant 7).
        return Ok(());
    }

    let room = state.rooms.get_or_create(&request.board_id);
    let user = Arc::new(User::new(user_id.clone(), request.board_id.clone(), conn));
    state.users.set(user_id.clone(), user);
    room.add_user(user_id.clone());

    info!(user_id = %user_id, board_id = %request.board_id, "user registered");

    let message = OutboundMessage::UserConnected {
        board_id: room.board_id.clone(),
        user_ids: room.users(),
        leader_id: room.leader_id(),
    };
    let users = Arc::clone(&state.users);
    broadcast_to_room(&state.users, &room.users(), &message, move |id| {
        let users = Arc::clone(&users);
        async move { users.delete(&id) }
    })
    .await;

    Ok(())
}

async fn handle_set_leader(state: &AppState, request: SetLeaderRequest) -> Result<(), MessageError> {
    let user_id = state
        .auth_gate
        .cache_or_validate(&request.jwt, &request.board_id)
        .await?;

    let user = state
        .users
        .get(&user_id)
        .ok_or(MessageError::PreconditionFailed("user not registered"))?;
    if user.room_id != request.board_id {
        return Err(MessageError::PreconditionFailed("user not in this room"));
    }

    let room = state
        .rooms
        .get(&request.board_id)
        .ok_or(MessageError::PreconditionFailed("room does not exist"))?;

    let current_leader = room.leader_id();
    let new_leader = if current_leader == NO_LEADER {
        user_id.clone()
    } else if current_leader == user_id {
        NO_LEADER.to_string()
    } else {
        // Someone else already holds leadership: request rejected, no-op.
        return Ok(());
    };
    room.set_leader(new_leader.clone());

    let message = OutboundMessage::SetLeader {
        board_id: room.board_id.clone(),
        user_id: new_leader,
    };
    let users = Arc::clone(&state.users);
    broadcast_to_room(&state.users, &room.users(), &message, move |id| {
        let users = Arc::clone(&users);
        async move { users.delete(&id) }
    })
    .await;

    Ok(())
}

async fn handle_new_data(state: &AppState, request: NewDataRequest) -> Result<(), MessageError> {
    let user_id = state
        .auth_gate
        .cache_or_validate(&request.jwt, &request.board_id)
        .await?;

    let user = state
        .users
        .get(&user_id)
        .ok_or(MessageError::PreconditionFailed("user not registered"))?;
    if user.room_id != request.board_id {
        return Err(MessageError::PreconditionFailed("user not in this room"));
    }

    let room = state
        .rooms
        .get(&request.board_id)
        .ok_or(MessageError::PreconditionFailed("room does not exist"))?;
    if room.leader_id() != user_id {
        return Err(MessageError::PreconditionFailed("user is not the leader"));
    }

    room.set_elements(request.data.elements);
    room.set_app_state(request.data.app_state);

    let message = OutboundMessage::NewData {
        board_id: room.board_id.clone(),
        data: crate::message::BoardData {
            elements: room.elements(),
            app_state: room.app_state(),
        },
    };

    let state_for_cleanup = state.clone();
    broadcast_to_room(&state.users, &room.users(), &message, move |id| {
        let state = state_for_cleanup.clone();
        async move { unregister_user_id(&state, &id).await }
    })
    .await;

    Ok(())
}

/// Find the user behind `conn_id` and run the full disconnect flow.
async fn unregister_user(state: &AppState, conn_id: Uuid) {
    let Some(user) = state.users.get_where(|u| u.conn.id == conn_id) else {
        return;
    };
    unregister_user_id(state, &user.id).await;
}

/// Remove `user_id` from its room (resetting leadership if it held it),
/// delete its room if now empty, otherwise broadcast `userDisconnected`.
async fn unregister_user_id(state: &AppState, user_id: &str) {
    let Some(user) = state.users.get(user_id) else {
        return;
    };

    if let Some(room) = state.rooms.get(&user.room_id) {
        room.remove_user(user_id);
        if room.leader_id() == user_id {
            room.set_leader(NO_LEADER.to_string());
        }
        state.users.delete(user_id);

        if room.is_empty() {
            state.rooms.delete(&room.board_id);
        } else {
            let message = OutboundMessage::UserDisconnected {
                board_id: room.board_id.clone(),
                user_ids: room.users(),
                leader_id: room.leader_id(),
            };
            let users = Arc::clone(&state.users);
            broadcast_to_room(&state.users, &room.users(), &message, move |id| {
                let users = Arc::clone(&users);
                async move { users.delete(&id) }
            })
            .await;
        }
    } else {
        state.users.delete(user_id);
    }

    user.conn.close().await;
    info!(user_id = %user_id, "user unregistered");
}
