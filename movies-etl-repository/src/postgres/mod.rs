//! PostgreSQL implementation of the movie source.

mod client;
mod queries;

pub use client::PostgresMovieSource;
pub use queries::changed_movies_query;
