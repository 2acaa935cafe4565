//! Concurrent keyed stores for users and rooms.
//!
//! Both stores are built on `dashmap::DashMap`, following this codebase's
//! existing use of `DashMap` for the websocket connection registry. The
//! trait is kept even though only the in-memory backend ships, so a remote
//! KV-backed store could be substituted later without touching call sites.

use std::sync::Arc;

use dashmap::DashMap;

use crate::room::Room;
use crate::user::User;

/// A simple, atomic-per-key mapping. `set`/`get`/`delete` never fail for the
/// in-memory backend.
pub trait KeyedStore<V>: Send + Sync {
    fn set(&self, key: String, value: V);
    fn get(&self, key: &str) -> Option<V>;
    fn delete(&self, key: &str);
    fn len(&self) -> usize;
}

/// Users store. Exclusively owns every `User` entry.
pub struct UsersStore {
    items: DashMap<String, Arc<User>>,
}

impl UsersStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Linear scan for the first entry matching `predicate`. Used by the
    /// connection handler to find a user by connection identity rather than
    /// by user ID.
    pub fn get_where<F>(&self, predicate: F) -> Option<Arc<User>>
    where
        F: Fn(&User) -> bool,
    {
        self.items
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

impl Default for UsersStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyedStore<Arc<User>> for UsersStore {
    fn set(&self, key: String, value: Arc<User>) {
        self.items.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<Arc<User>> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    fn delete(&self, key: &str) {
        self.items.remove(key);
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Rooms store, keyed by `board_id`.
pub struct RoomsStore {
    items: DashMap<String, Arc<Room>>,
}

impl RoomsStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Returns the existing room for `board_id`, creating an empty one if
    /// none exists yet.
    pub fn get_or_create(&self, board_id: &str) -> Arc<Room> {
        self.items
            .entry(board_id.to_string())
            .or_insert_with(|| Arc::new(Room::new(board_id.to_string())))
            .value()
            .clone()
    }
}

impl Default for RoomsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyedStore<Arc<Room>> for RoomsStore {
    fn set(&self, key: String, value: Arc<Room>) {
        self.items.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<Arc<Room>> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    fn delete(&self, key: &str) {
        self.items.remove(key);
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
