//! Internal user entities.

pub mod model;

pub use model::InternalUser;
