//! HTTP adapter for bulk imports.

mod handlers;
mod routes;

pub use handlers::ImportHandlers;
pub use routes::import_routes;
