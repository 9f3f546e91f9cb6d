pub mod assets;
pub mod audit;
pub mod config;
pub mod dto;
pub mod error;
pub mod response;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;
pub mod store;
