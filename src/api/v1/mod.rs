/*
 * Responsibility
 * - v1 の公開ポイント (routes() / internal_routes() の re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{internal_routes, routes};
