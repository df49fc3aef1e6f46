// Student and parent accounts: registration, login, profile, and the
// student/parent-scoped batch views

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{RegisterUserRequest, User, UserPublic};
pub use repository::UserRepository;
