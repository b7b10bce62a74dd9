// Services module for the gatekeeper
// Collaborators consumed by the pipeline and handlers

pub mod jwt;
pub mod user_directory;

// Re-export commonly used services
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use user_directory::{DirectoryError, InMemoryUserDirectory, UserDirectory};
