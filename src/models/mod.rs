pub mod admin_user;
pub mod resource;
pub mod session;
pub mod user;
