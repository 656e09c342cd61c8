//! Cache Module
//!
//! Value cache assigning random keys to stored values, with call counting
//! and history on `store`.

mod value;
mod value_cache;


// Re-export public types
pub use value::StoredValue;
pub use value_cache::{ValueCache, STORE_QUALNAME};
