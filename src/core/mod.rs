pub mod chat;
pub mod config;
pub mod message;
pub mod page;
pub mod picker;
pub mod tasks;
pub mod transcript;
