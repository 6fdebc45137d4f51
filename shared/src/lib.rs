pub mod api;
pub mod client;
pub mod models;
pub mod quantity;
