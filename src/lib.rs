pub mod auth;
pub mod broadcast;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod message;
pub mod room;
pub mod state;
pub mod store;
pub mod user;
pub mod websocket;
