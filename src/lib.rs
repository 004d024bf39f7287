pub mod config;
pub mod drawing;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;
