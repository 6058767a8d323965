pub mod menu;
pub mod question;
pub mod setup;
pub mod summary;
