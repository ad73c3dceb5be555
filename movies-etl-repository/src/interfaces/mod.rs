//! Interface definitions for the store and search engine adapters.
//!
//! The pipeline depends on these traits only, which allows dependency
//! injection and mock implementations in tests.

mod movie_source;
mod search_engine_client;

pub use movie_source::MovieSource;
pub use search_engine_client::SearchEngineClient;
