//! Row structs for the attendance tables.
//!
//! Each row converts into its `presensi_core` entity; the database-only
//! columns (`id`, `created_at`, ...) stay here.

pub mod presence;
pub mod qr_token;
