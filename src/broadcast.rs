//! Fan-out of a single outbound message to every member of a room.

use std::future::Future;

use crate::message::OutboundMessage;
use crate::store::{KeyedStore, UsersStore};

/// Write `message` to every user in `member_ids`, skipping members whose
/// store entry has already vanished (a non-error: the peer is simply gone).
///
/// On a write failure for a given peer, `on_failure` is awaited with that
/// peer's ID. Callers decide what cleanup a failed write implies: a plain
/// store removal for most events, or the full disconnect flow for `newData`.
pub async fn broadcast_to_room<F, Fut>(
    users: &UsersStore,
    member_ids: &[String],
    message: &OutboundMessage,
    on_failure: F,
) where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ()>,
{
    for member_id in member_ids {
        let Some(user) = users.get(member_id) else {
            continue;
        };

        if user.conn.send(message).await.is_err() {
            on_failure(member_id.clone()).await;
        }
    }
}
