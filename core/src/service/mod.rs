pub mod session;
pub mod summary;
pub mod tracker;
pub mod validation;
