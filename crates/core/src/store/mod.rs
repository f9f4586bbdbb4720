//! Storage seam of the attendance engine.
//!
//! The engine owns every validation rule; a store only persists tokens and
//! presence records and provides the one atomic step the engine cannot do
//! on its own: consuming a token and upserting the presence record it
//! unlocks.

mod memory;

pub use memory::MemoryAttendanceStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{CheckIn, PresenceKey, PresenceRecord, Token};

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Short backend label for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Persist a freshly minted token.
    async fn insert_token(&self, token: &Token) -> Result<(), StoreError>;

    /// Look up a token by its code.
    async fn find_token(&self, token_code: &str) -> Result<Option<Token>, StoreError>;

    /// Atomically flip the token's `used` flag from `false` to `true` and
    /// upsert the presence record for `check_in.key`.
    ///
    /// Returns `None` when the token was already consumed, in which case
    /// nothing is written. An existing record keeps its `presence_id`.
    async fn commit_check_in(
        &self,
        token_code: &str,
        check_in: &CheckIn,
    ) -> Result<Option<PresenceRecord>, StoreError>;

    /// Look up the presence record for a key.
    async fn find_presence(&self, key: &PresenceKey)
        -> Result<Option<PresenceRecord>, StoreError>;

    /// Presence records of one session, most recent check-in first.
    async fn list_presence(
        &self,
        course_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<PresenceRecord>, StoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
