//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (PBKDF2-HMAC-SHA256, salted and iterated)
//! - Random string generation for salts
//! - JWT claim sets, token encoding and validation
//! - Authentication coordination
//!
//! Each service defines its own authentication policy and adapts these
//! implementations. Secrets, signing algorithm and token lifetimes are
//! injected at construction time from process configuration; nothing in this
//! crate reads ambient global state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::password;
//!
//! let encoded = password::make_password("my_password").unwrap();
//! assert!(password::check_password(Some("my_password"), Some(&encoded)));
//! assert!(!password::check_password(Some("wrong_password"), Some(&encoded)));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Authenticator, TokenPurpose};
//! use jsonwebtoken::Algorithm;
//!
//! let authenticator = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!!",
//!     Algorithm::HS256,
//!     3600,
//! );
//!
//! let issued = authenticator.issue_token(42, TokenPurpose::Access).unwrap();
//! assert_eq!(issued.token_type, "bearer");
//!
//! let claims = authenticator.validate_token(&issued.access_token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod random;

// Re-export commonly used items
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenPurpose;
pub use password::PasswordError;
pub use password::PasswordHasher;
