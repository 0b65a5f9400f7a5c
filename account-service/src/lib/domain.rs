pub mod account;
pub mod authz;
pub mod roles;
