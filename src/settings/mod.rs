//! Configuration loader and schema types.
//!
//! Settings come from struct defaults, an optional TOML file and
//! `NETFLIX_EXPLORER__*` environment variables, in increasing precedence.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
