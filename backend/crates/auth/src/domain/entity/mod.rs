pub mod customer;
pub mod refresh_session;

pub use customer::Customer;
pub use refresh_session::RefreshSession;
