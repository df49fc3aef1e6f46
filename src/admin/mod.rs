// Administrator (teacher) accounts: registration, login, and listing

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{AdminPublic, AdminUser, LoginAdminRequest, RegisterAdminRequest};
pub use repository::AdminRepository;
