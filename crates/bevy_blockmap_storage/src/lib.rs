//! # `bevy_blockmap_storage`
//!
//! Keyed cache for generic JSON storage documents (settings, save games, level
//! metadata), with explicit eviction and write-back.
//!
//! [`DocumentCache`] is a plain object with `&mut self` access. Share it between
//! systems through the [`SharedDocumentCache`] resource added by
//! [`BlockmapStoragePlugin`].

pub mod cache;
mod error;
pub mod persist;
pub mod plugin;

pub use cache::{DocumentCache, SaveReport, SharedDocumentCache};
pub use error::StorageError;
pub use persist::{Document, WriteOutcome, read_document, write_document};
pub use plugin::{BlockmapStoragePlugin, StorageConfig};

pub mod prelude {
    //! Common imports for `bevy_blockmap_storage` users.

    pub use crate::cache::{DocumentCache, SaveReport, SharedDocumentCache};
    pub use crate::error::StorageError;
    pub use crate::persist::Document;
    pub use crate::plugin::{BlockmapStoragePlugin, StorageConfig};
}
