//! Station directory adapters.
//!
//! - `HttpStationDirectory` - remote JSON catalogue queried by coordinates
//! - `InMemoryStationDirectory` - fixed catalogue for tests

mod http_directory;
mod in_memory;

pub use http_directory::HttpStationDirectory;
pub use in_memory::InMemoryStationDirectory;
