//! Postgres connection pool and schema.

pub mod pool;
pub mod schema;

pub use pool::create_pool;
