//! Shared earthquake data model.
//!
//! Everything a UI layer needs to render the list lives here, so it can
//! depend on this crate without pulling in the HTTP stack.

pub mod error;
pub mod query;
pub mod types;

pub use error::QueryError;
pub use query::{QueryConfig, SortOrder};
pub use types::*;
