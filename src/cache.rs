//! Authorization cache: `credential -> user_id`, with a time-to-live.
//!
//! A hit is (value present AND not expired); anything else is a miss. Earlier
//! implementations of this kind of cache sometimes treat "present but stale"
//! as a hit anyway; that's deliberately not reproduced here.

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Entry {
    user_id: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

pub struct AuthCache {
    items: DashMap<String, Entry>,
}

impl AuthCache {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Returns the cached `user_id` for `credential` if present and not
    /// expired. An expired entry is treated as absent without being
    /// physically evicted here — eviction is opportunistic, not a
    /// correctness requirement.
    pub fn get(&self, credential: &str) -> Option<String> {
        let entry = self.items.get(credential)?;
        if entry.is_expired(Instant::now()) {
            return None;
        }
        Some(entry.user_id.clone())
    }

    /// Insert `credential -> user_id`, expiring after `ttl`. A zero `ttl`
    /// means no expiry.
    pub fn set_with_ttl(&self, credential: String, user_id: String, ttl: Duration) {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        self.items.insert(credential, Entry { user_id, expires_at });
    }

    pub fn set(&self, credential: String, user_id: String) {
        self.set_with_ttl(credential, user_id, Duration::ZERO);
    }
}

impl Default for AuthCache {
    fn default() -> Self {
        Self::new()
    }
}
