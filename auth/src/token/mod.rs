pub mod errors;
pub mod verifier;

pub use errors::ServiceTokenError;
pub use verifier::ServiceTokenVerifier;
