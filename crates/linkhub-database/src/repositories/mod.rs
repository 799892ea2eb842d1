//! PostgreSQL repository implementations of the store traits.

pub mod social_account;
pub mod user;

pub use social_account::SocialAccountRepository;
pub use user::UserRepository;
