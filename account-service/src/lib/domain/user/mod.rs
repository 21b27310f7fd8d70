pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::{UserError, UserIdError, UsernameError};
pub use models::{CreateUserCommand, NewUser, UpdateUserCommand, User, UserId, Username};
pub use ports::{UserRepository, UserServicePort};
pub use service::UserService;
