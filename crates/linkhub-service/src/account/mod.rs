//! Credential linking and the account service operations.

pub mod linker;
pub mod service;

pub use linker::AccountLinker;
pub use service::AccountService;
