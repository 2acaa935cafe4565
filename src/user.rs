use std::sync::Arc;

use crate::connection::Connection;

/// A connected participant. Exclusively owned by the users store; a `Room`
/// only ever holds the user's `id` and looks entries up by it.
pub struct User {
    pub id: String,
    pub room_id: String,
    pub conn: Arc<Connection>,
}

impl User {
    pub fn new(id: String, room_id: String, conn: Arc<Connection>) -> Self {
        Self { id, room_id, conn }
    }
}
