use std::sync::RwLock;

/// Sentinel `leader_id` meaning "no current leader".
pub const NO_LEADER: &str = "0";

/// Server-side state for all users currently editing one board.
///
/// All mutators take the room's exclusive lock; all accessors take a shared
/// lock. Lock scopes never span an `.await` — every method here is
/// synchronous, so handlers never hold a room lock across an HTTP validation
/// call.
pub struct Room {
    pub board_id: String,
    inner: RwLock<Inner>,
}

struct Inner {
    users: Vec<String>,
    leader_id: String,
    elements: String,
    app_state: String,
}

impl Room {
    pub fn new(board_id: String) -> Self {
        Self {
            board_id,
            inner: RwLock::new(Inner {
                users: Vec::new(),
                leader_id: NO_LEADER.to_string(),
                elements: String::new(),
                app_state: String::new(),
            }),
        }
    }

    /// Appends `user_id`. The caller must have already ensured this user
    /// isn't a member of any room.
    pub fn add_user(&self, user_id: String) {
        let mut inner = self.inner.write().expect("room lock poisoned");
        inner.users.push(user_id);
    }

    /// Removes `user_id`; a no-op if absent.
    pub fn remove_user(&self, user_id: &str) {
        let mut inner = self.inner.write().expect("room lock poisoned");
        inner.users.retain(|id| id != user_id);
    }

    pub fn set_leader(&self, leader_id: String) {
        let mut inner = self.inner.write().expect("room lock poisoned");
        inner.leader_id = leader_id;
    }

    pub fn set_elements(&self, elements: String) {
        let mut inner = self.inner.write().expect("room lock poisoned");
        inner.elements = elements;
    }

    pub fn set_app_state(&self, app_state: String) {
        let mut inner = self.inner.write().expect("room lock poisoned");
        inner.app_state = app_state;
    }

    pub fn leader_id(&self) -> String {
        self.inner.read().expect("room lock poisoned").leader_id.clone()
    }

    pub fn elements(&self) -> String {
        self.inner.read().expect("room lock poisoned").elements.clone()
    }

    pub fn app_state(&self) -> String {
        self.inner.read().expect("room lock poisoned").app_state.clone()
    }

    /// Snapshot of member IDs in join order, safe to iterate without holding
    /// the room lock.
    pub fn users(&self) -> Vec<String> {
        self.inner.read().expect("room lock poisoned").users.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("room lock poisoned").users.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.inner
            .read()
            .expect("room lock poisoned")
            .users
            .iter()
            .any(|id| id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_starts_unset() {
        let room = Room::new("board-1".to_string());
        assert_eq!(room.leader_id(), NO_LEADER);
    }

    #[test]
    fn add_and_remove_user_tracks_membership() {
        let room = Room::new("board-1".to_string());
        room.add_user("u1".to_string());
        room.add_user("u2".to_string());
        assert_eq!(room.users(), vec!["u1".to_string(), "u2".to_string()]);

        room.remove_user("u1");
        assert_eq!(room.users(), vec!["u2".to_string()]);
        assert!(!room.is_empty());

        room.remove_user("u2");
        assert!(room.is_empty());
    }

    #[test]
    fn elements_and_app_state_round_trip() {
        let room = Room::new("board-1".to_string());
        room.set_elements("E".to_string());
        room.set_app_state("A".to_string());
        assert_eq!(room.elements(), "E");
        assert_eq!(room.app_state(), "A");
    }
}
