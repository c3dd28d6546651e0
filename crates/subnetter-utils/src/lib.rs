//! # Subnetter Utils
//!
//! Data-shape helpers shared by the provider adapter and the CLI.
//! Tag and output flattening, naming helpers and input parsers live here;
//! none of them carry allocation rules.

pub mod errors;
pub mod names;
pub mod parsers;
pub mod tags;

// Re-export common types for convenience
pub use errors::*;
pub use names::*;
pub use parsers::*;
pub use tags::*;
