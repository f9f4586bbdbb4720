pub mod health;
pub mod presence;
