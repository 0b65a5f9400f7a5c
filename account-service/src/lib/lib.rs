pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::account;
pub use domain::authz;
pub use domain::roles;
pub use outbound::repositories;
