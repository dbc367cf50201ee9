//! Storage and lookup collaborators for content authoring.
//!
//! - [`ContentStore`]: create/read/update/delete/list of saved records, with
//!   an in-memory and a JSON-directory implementation.
//! - [`LookupSource`]: remote reference lookups returning JSON, with an
//!   HTTP implementation and an explicitly owned expiring cache.

pub mod error;
pub mod fs;
pub mod lookup;
pub mod store;

pub use error::{Result, StoreError};
pub use lookup::{CacheConfig, HttpLookupSource, LookupCache, LookupError, LookupSource};
pub use store::{ContentStore, JsonDirStore, ListFilter, MemoryStore, SortOrder};
