use std::sync::Arc;

use crate::auth::AuthGate;
use crate::store::{RoomsStore, UsersStore};

/// Process-global shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UsersStore>,
    pub rooms: Arc<RoomsStore>,
    pub auth_gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(users: Arc<UsersStore>, rooms: Arc<RoomsStore>, auth_gate: Arc<AuthGate>) -> Self {
        Self {
            users,
            rooms,
            auth_gate,
        }
    }
}
