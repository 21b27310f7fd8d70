pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::AuthError;
pub use models::{Credentials, Principal};
pub use ports::AuthServicePort;
pub use service::AuthService;
