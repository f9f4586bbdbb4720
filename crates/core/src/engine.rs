//! The attendance token engine.
//!
//! One engine serves every deployment; only the injected
//! [`AttendanceStore`] differs between the in-memory and database-backed
//! variants.

use std::sync::Arc;

use crate::countdown::{countdown, DEFAULT_LOW_TIME_SECS};
use crate::error::CoreError;
use crate::models::{
    CheckIn, CheckInReceipt, CheckInRequest, GenerateTokenRequest, IssuedToken, ListQuery,
    PresenceKey, PresenceRecord, PresenceStatusView, StatusQuery, Token, TokenInspection,
    TokenStatusQuery,
};
use crate::qr::normalize_scanned_payload;
use crate::store::AttendanceStore;
use crate::token::{generate_token_code, TokenPolicy};
use crate::types::Timestamp;
use crate::validation::{clamp_limit, parse_limit, parse_ts, require};

#[derive(Clone)]
pub struct AttendanceEngine {
    store: Arc<dyn AttendanceStore>,
    policy: TokenPolicy,
    low_time_secs: i64,
}

impl AttendanceEngine {
    pub fn new(store: Arc<dyn AttendanceStore>, policy: TokenPolicy) -> Self {
        Self {
            store,
            policy,
            low_time_secs: DEFAULT_LOW_TIME_SECS,
        }
    }

    /// Override the countdown threshold used by [`Self::inspect_token`].
    pub fn with_low_time_threshold(mut self, secs: i64) -> Self {
        self.low_time_secs = secs;
        self
    }

    pub fn store(&self) -> &Arc<dyn AttendanceStore> {
        &self.store
    }

    /// Mint a new token bound to a course session.
    ///
    /// Earlier tokens of the same session are left untouched and stay valid
    /// until they expire or are consumed.
    pub async fn generate_token(
        &self,
        input: &GenerateTokenRequest,
    ) -> Result<IssuedToken, CoreError> {
        let course_id = require(input.course_id.as_deref(), "course_id")?;
        let session_id = require(input.session_id.as_deref(), "session_id")?;
        let issued_at = parse_ts(require(input.ts.as_deref(), "ts")?)?;

        let token = Token {
            token_code: generate_token_code(),
            course_id: course_id.to_string(),
            session_id: session_id.to_string(),
            issued_at,
            expires_at: self.policy.expires_at(issued_at),
            used: false,
        };
        self.store.insert_token(&token).await?;

        Ok(IssuedToken {
            token_code: token.token_code,
            expires_at: token.expires_at,
        })
    }

    /// Validate a check-in against its token and record presence.
    ///
    /// Checks run in a fixed order and the first failure wins: missing
    /// fields, timestamp, unknown token, course/session binding, expiry,
    /// prior use. The final consume-and-upsert is delegated to the store
    /// as a single atomic step; losing that race is `TokenAlreadyUsed`.
    pub async fn check_in(&self, input: &CheckInRequest) -> Result<CheckInReceipt, CoreError> {
        let user_id = require(input.user_id.as_deref(), "user_id")?;
        let device_id = require(input.device_id.as_deref(), "device_id")?;
        let course_id = require(input.course_id.as_deref(), "course_id")?;
        let session_id = require(input.session_id.as_deref(), "session_id")?;
        let token_code = normalize_scanned_payload(require(input.qr_token.as_deref(), "qr_token")?);
        if token_code.is_empty() {
            return Err(CoreError::MissingField("qr_token"));
        }
        let ts = parse_ts(require(input.ts.as_deref(), "ts")?)?;

        let token = self
            .store
            .find_token(&token_code)
            .await?
            .ok_or(CoreError::TokenInvalid)?;

        if !token.is_bound_to(course_id, session_id) {
            return Err(CoreError::TokenInvalid);
        }
        if token.is_expired_at(ts) {
            return Err(CoreError::TokenExpired);
        }
        if token.used {
            return Err(CoreError::TokenAlreadyUsed);
        }

        let check_in = CheckIn {
            key: PresenceKey {
                user_id: user_id.to_string(),
                course_id: course_id.to_string(),
                session_id: session_id.to_string(),
            },
            device_id: device_id.to_string(),
            ts,
        };

        let record = self
            .store
            .commit_check_in(&token.token_code, &check_in)
            .await?
            .ok_or(CoreError::TokenAlreadyUsed)?;

        Ok(CheckInReceipt {
            presence_id: record.presence_id,
            status: record.status,
        })
    }

    /// Last known presence of a student. Absence is a valid answer, not an error.
    pub async fn check_status(&self, input: &StatusQuery) -> Result<PresenceStatusView, CoreError> {
        let key = PresenceKey {
            user_id: require(input.user_id.as_deref(), "user_id")?.to_string(),
            course_id: require(input.course_id.as_deref(), "course_id")?.to_string(),
            session_id: require(input.session_id.as_deref(), "session_id")?.to_string(),
        };

        Ok(match self.store.find_presence(&key).await? {
            Some(record) => PresenceStatusView::from(record),
            None => PresenceStatusView::not_checked_in(key),
        })
    }

    /// Check-ins of one session for monitoring dashboards.
    pub async fn list_session(&self, input: &ListQuery) -> Result<Vec<PresenceRecord>, CoreError> {
        let course_id = require(input.course_id.as_deref(), "course_id")?;
        let session_id = require(input.session_id.as_deref(), "session_id")?;
        let limit = clamp_limit(parse_limit(input.limit.as_deref())?);

        Ok(self
            .store
            .list_presence(course_id, session_id, limit)
            .await?)
    }

    /// Token state and countdown as seen at `now`, for lecturer displays.
    pub async fn inspect_token(
        &self,
        input: &TokenStatusQuery,
        now: Timestamp,
    ) -> Result<TokenInspection, CoreError> {
        let token_code = normalize_scanned_payload(require(input.qr_token.as_deref(), "qr_token")?);
        if token_code.is_empty() {
            return Err(CoreError::MissingField("qr_token"));
        }

        let token = self
            .store
            .find_token(&token_code)
            .await?
            .ok_or(CoreError::TokenInvalid)?;
        let remaining = countdown(token.expires_at, now, self.low_time_secs);

        Ok(TokenInspection {
            token_code: token.token_code,
            course_id: token.course_id,
            session_id: token.session_id,
            expires_at: token.expires_at,
            used: token.used,
            remaining_secs: remaining.remaining_secs,
            band: remaining.band,
        })
    }
}
