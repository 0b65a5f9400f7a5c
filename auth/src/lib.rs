//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for microservices:
//! - Credential hashing (deterministic SHA-256 hex digest)
//! - Opaque token generation (CSPRNG-backed hex strings)
//! - Inter-service token verification and signing
//!
//! Each service defines its own authorization traits on top of these primitives.
//! This avoids coupling services through shared domain logic while reducing code duplication.
//!
//! # Examples
//!
//! ## Credential Hashing
//! ```
//! use auth::Hasher;
//!
//! let digest = Hasher::digest("my_pre_hashed_secret");
//! assert_eq!(digest.len(), 64);
//! assert_eq!(digest, Hasher::digest("my_pre_hashed_secret"));
//! ```
//!
//! ## Service Tokens
//! ```
//! use auth::ServiceTokenVerifier;
//! use chrono::Utc;
//!
//! let verifier = ServiceTokenVerifier::new("shared_secret");
//! let now = Utc::now().timestamp_millis();
//! let token = verifier.sign("users", now);
//!
//! let header = format!("Service {} users {}", token, now);
//! let identity = verifier
//!     .verify(
//!         Some(&header),
//!         Some("11111111-2222-3333-4444-555555555555"),
//!         Some("gateway"),
//!     )
//!     .unwrap();
//! assert!(identity.is_service());
//! ```

pub mod hasher;
pub mod identity;
pub mod token;

// Re-export commonly used items
pub use hasher::random_token;
pub use hasher::Hasher;
pub use identity::IdentityContext;
pub use token::ServiceTokenError;
pub use token::ServiceTokenVerifier;
