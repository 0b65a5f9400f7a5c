pub mod errors;
pub mod gate;

pub use errors::AuthzError;
pub use gate::AuthorizationGate;
pub use gate::LoginMode;
