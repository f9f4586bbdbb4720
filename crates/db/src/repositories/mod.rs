//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that take part in a check-in transaction accept any Postgres
//! executor so they run on either the pool or an open transaction.

pub mod presence_repo;
pub mod qr_token_repo;

pub use presence_repo::PresenceRepo;
pub use qr_token_repo::QrTokenRepo;
