pub mod admin_level;
pub mod email;

pub use admin_level::AdminLevel;
pub use email::Email;
