pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod method_override;
pub mod state;
pub mod users;
