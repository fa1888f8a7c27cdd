pub mod auth;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

#[cfg(test)]
pub mod testing;
