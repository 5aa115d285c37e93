pub mod passwords;
pub mod sessions;
pub mod strings;
pub mod time;
pub mod token;
