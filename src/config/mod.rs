//! Configuration for the `ptv` command line tool
//!
//! Provides types and parsing for `ptv.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
