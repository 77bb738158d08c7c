//! Guesstimate API Module
//!
//! HTTP surface of the tool server: the calculator and web search behind
//! `POST /tools/<name>`, plus listing and health endpoints.

pub mod handlers;
pub mod models;
pub mod server;

pub use handlers::*;
pub use models::*;
pub use server::*;
