//! The combined "cache or validate" gate in front of every room operation.

pub mod validators;

use std::time::Duration;

use crate::cache::AuthCache;
use crate::error::AuthGateError;

use validators::{BoardAccessValidator, IdentityValidator};

pub struct AuthGate {
    cache: AuthCache,
    identity: IdentityValidator,
    board: BoardAccessValidator,
    ttl: Duration,
}

impl AuthGate {
    pub fn new(identity: IdentityValidator, board: BoardAccessValidator, ttl: Duration) -> Self {
        Self {
            cache: AuthCache::new(),
            identity,
            board,
            ttl,
        }
    }

    /// Resolve `credential` to a `user_id`, authorized against `board_id`.
    ///
    /// On a cache hit the board-access check is *not* repeated — a
    /// deliberate throughput trade-off: access revoked after the first
    /// successful validation is only re-checked once the credential's TTL
    /// elapses.
    pub async fn cache_or_validate(
        &self,
        credential: &str,
        board_id: &str,
    ) -> Result<String, AuthGateError> {
        if let Some(user_id) = self.cache.get(credential) {
            return Ok(user_id);
        }

        let user_id = self.identity.validate(credential).await?;
        self.board.validate(board_id, credential).await?;
        self.cache
            .set_with_ttl(credential.to_string(), user_id.clone(), self.ttl);

        Ok(user_id)
    }
}
