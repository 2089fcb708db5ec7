pub mod cards;
pub mod cli;
pub mod error;
pub mod github;
pub mod loader;
pub mod models;
pub mod page;
pub mod server;
pub mod theme;
pub mod types;
pub mod view;
