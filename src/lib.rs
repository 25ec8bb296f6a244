pub mod booking;
pub mod database;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod item;
pub mod request;
pub mod user;
