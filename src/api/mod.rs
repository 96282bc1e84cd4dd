//! HTTP server and request handlers

pub mod routes;
pub mod server;

pub use server::*;
