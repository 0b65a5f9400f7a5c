pub mod account;
pub mod roles;

pub use account::PostgresAccountRepository;
pub use roles::PostgresRoleStore;
