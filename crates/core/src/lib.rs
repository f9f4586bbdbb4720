//! Domain core of the dynamic-QR attendance service.
//!
//! Holds everything that does not depend on a transport or a database:
//! the error taxonomy, input validation, the token engine, the storage
//! trait with its in-memory implementation, and the QR helpers used by
//! scanners and lecturer displays.

pub mod countdown;
pub mod engine;
pub mod error;
pub mod models;
pub mod qr;
pub mod store;
pub mod token;
pub mod types;
pub mod validation;
