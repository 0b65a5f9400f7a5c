pub mod email;
pub mod gateway;
pub mod repositories;
