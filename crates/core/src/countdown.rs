//! Remaining-time projection of a token's `expires_at` for QR displays.
//!
//! Purely derived from `expires_at` and the current time; carries no state.

use serde::Serialize;

use crate::types::Timestamp;

/// Default threshold (seconds) below which a display switches to the low band.
pub const DEFAULT_LOW_TIME_SECS: i64 = 30;

/// Display band of a token countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownBand {
    Plenty,
    Low,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Whole seconds left, rounded up so a display never shows 0 early.
    pub remaining_secs: i64,
    pub band: CountdownBand,
}

/// Compute the countdown for a token expiring at `expires_at`, seen at `now`.
pub fn countdown(expires_at: Timestamp, now: Timestamp, low_threshold_secs: i64) -> Countdown {
    let remaining_ms = (expires_at - now).num_milliseconds();
    if remaining_ms <= 0 {
        return Countdown {
            remaining_secs: 0,
            band: CountdownBand::Expired,
        };
    }

    let remaining_secs = (remaining_ms + 999) / 1000;
    let band = if remaining_secs <= low_threshold_secs {
        CountdownBand::Low
    } else {
        CountdownBand::Plenty
    };

    Countdown {
        remaining_secs,
        band,
    }
}
