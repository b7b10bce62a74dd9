pub mod auth;
pub mod user;

// Re-export common types
pub use auth::*;
pub use user::*;
