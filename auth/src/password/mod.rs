pub mod errors;
pub mod pbkdf2;

pub use errors::PasswordError;
pub use pbkdf2::check_password;
pub use pbkdf2::is_hash_usable;
pub use pbkdf2::make_password;
pub use pbkdf2::PasswordHasher;
