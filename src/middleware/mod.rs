// Pipeline stages and the request identity they share

pub mod cors;
pub mod gatekeeper;
pub mod principal;
pub mod token_verification;

pub use cors::cors_stage;
pub use gatekeeper::gatekeeper_stage;
pub use principal::Principal;
pub use token_verification::token_verification_stage;
