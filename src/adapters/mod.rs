//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model backends (Anthropic, OpenAI, static fallback)
//! - `auth` - Session validators (static development tokens, mock)
//! - `http` - axum routers, middleware, and error mapping
//! - `postgres` - Record store over PostgreSQL
//! - `stations` - Nearby-station directory clients
//! - `storage` - In-memory session repository and record store

pub mod ai;
pub mod auth;
pub mod http;
pub mod postgres;
pub mod stations;
pub mod storage;
