//! # `bevy_blockmap_assets`
//!
//! Loads JSON tile maps and their linked `.tsx` tileset descriptors into a layered,
//! bottom-up block grid.
//!
//! The pipeline runs synchronously, one map per call:
//!
//! 1. [`document`] parses the map and keeps its tile layers
//! 2. [`tileset`] resolves each tileset reference through [`descriptor`]
//! 3. [`gid`] maps every raw cell value to a tileset and local tile type
//! 4. [`grid`] assembles the [`BlockMap`], flipping rows so `y = 0` is the bottom
//!
//! [`BlockMapAssetLoader`](loaders::map::BlockMapAssetLoader) runs the same pipeline
//! inside Bevy's asset server. Outside Bevy, call [`load_block_map`] with any
//! [`ImageSource`].

pub mod assets;
pub mod config;
pub mod descriptor;
pub mod document;
mod error;
pub mod gid;
pub mod grid;
pub mod loaders;
pub mod plugin;
pub mod reader;
pub mod tileset;

#[cfg(test)]
mod test_support;

pub use config::{BlockmapLoaderSettings, UnresolvedGidPolicy};
pub use error::MapLoadError;
pub use grid::{Block, BlockLayer, BlockMap, load_block_map};
pub use plugin::BlockmapAssetsPlugin;
pub use tileset::{ImageSource, Tileset};

/// Prelude module for convenient imports
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_blockmap_assets::prelude::*;
///
/// fn my_system(maps: Res<Assets<BlockMapAsset>>) {
///     for (_id, asset) in maps.iter() {
///         let _solid = asset.map.is_solid(0, 0);
///     }
/// }
/// ```
pub mod prelude {
    pub use crate::assets::map::BlockMapAsset;
    pub use crate::config::{BlockmapLoaderSettings, UnresolvedGidPolicy};
    pub use crate::error::MapLoadError;
    pub use crate::gid::TileFlip;
    pub use crate::grid::{Block, BlockLayer, BlockMap};
    pub use crate::plugin::BlockmapAssetsPlugin;
    pub use crate::tileset::{ImageSource, Tileset};
}
