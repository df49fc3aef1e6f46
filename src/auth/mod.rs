// Authentication module
// Password hashing, bearer token issuance/verification, and the extractor
// that injects authenticated identity into handlers

pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use models::{Claims, Role};
pub use password::PasswordService;
pub use token::TokenService;
