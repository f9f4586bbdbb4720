use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{
    format_presence_id, CheckIn, PresenceKey, PresenceRecord, PresenceStatus, Token,
};
use crate::store::AttendanceStore;

/// A presence record plus the numeric sequence its id was formatted from.
struct StoredPresence {
    seq: i64,
    record: PresenceRecord,
}

#[derive(Default)]
struct MemoryState {
    tokens: HashMap<String, Token>,
    presence: HashMap<PresenceKey, StoredPresence>,
    last_presence_seq: i64,
}

/// In-process store used by tests and database-less deployments.
///
/// A single mutex guards all maps, so every trait call is one critical
/// section and concurrent check-ins on the same token are serialized.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    state: Mutex<MemoryState>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert_token(&self, token: &Token) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.tokens.contains_key(&token.token_code) {
            return Err(StoreError::Corrupt("token code collision on insert".into()));
        }
        state
            .tokens
            .insert(token.token_code.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, token_code: &str) -> Result<Option<Token>, StoreError> {
        Ok(self.state.lock().await.tokens.get(token_code).cloned())
    }

    async fn commit_check_in(
        &self,
        token_code: &str,
        check_in: &CheckIn,
    ) -> Result<Option<PresenceRecord>, StoreError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let token = state
            .tokens
            .get_mut(token_code)
            .ok_or_else(|| StoreError::Corrupt("token vanished before commit".into()))?;
        if token.used {
            return Ok(None);
        }
        token.used = true;

        if let Some(StoredPresence { record, .. }) = state.presence.get_mut(&check_in.key) {
            record.status = PresenceStatus::CheckedIn;
            record.last_ts = check_in.ts;
            record.device_id = check_in.device_id.clone();
            return Ok(Some(record.clone()));
        }

        state.last_presence_seq += 1;
        let seq = state.last_presence_seq;
        let record = PresenceRecord {
            presence_id: format_presence_id(seq),
            user_id: check_in.key.user_id.clone(),
            course_id: check_in.key.course_id.clone(),
            session_id: check_in.key.session_id.clone(),
            device_id: check_in.device_id.clone(),
            status: PresenceStatus::CheckedIn,
            last_ts: check_in.ts,
        };
        state.presence.insert(
            check_in.key.clone(),
            StoredPresence {
                seq,
                record: record.clone(),
            },
        );
        Ok(Some(record))
    }

    async fn find_presence(
        &self,
        key: &PresenceKey,
    ) -> Result<Option<PresenceRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.presence.get(key).map(|stored| stored.record.clone()))
    }

    async fn list_presence(
        &self,
        course_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<PresenceRecord>, StoreError> {
        let state = self.state.lock().await;
        let mut matching: Vec<&StoredPresence> = state
            .presence
            .values()
            .filter(|s| s.record.course_id == course_id && s.record.session_id == session_id)
            .collect();
        // Ties on last_ts fall back to allocation order, not the id string,
        // so PR-9999 stays ahead of PR-10000.
        matching.sort_by(|a, b| {
            b.record
                .last_ts
                .cmp(&a.record.last_ts)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        Ok(matching
            .into_iter()
            .take(usize::try_from(limit.max(0)).unwrap_or(usize::MAX))
            .map(|s| s.record.clone())
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
