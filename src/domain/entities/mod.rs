pub mod image;
pub mod project;
pub mod token;
pub mod user;
