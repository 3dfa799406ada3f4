//! Data models shared by the platform services.

mod user;

pub use user::{AuthUser, ProfileUpdate};
