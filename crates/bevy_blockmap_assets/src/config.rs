//! Loader settings for block maps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Layer property that marks the collision layer unless overridden.
pub const DEFAULT_COLLISION_PROPERTY: &str = "collision";

/// What to do with a tile id that is smaller than every tileset's first gid.
///
/// Such an id belongs to no tileset. Tiled never writes one, so seeing it
/// means the map and its tileset list disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedGidPolicy {
    /// Store the cell as empty and log a warning per affected layer.
    #[default]
    Empty,
    /// Abort the load with [`MapLoadError::UnresolvedGid`](crate::MapLoadError::UnresolvedGid).
    Fail,
}

/// Settings for [`BlockMapAssetLoader`](crate::loaders::map::BlockMapAssetLoader).
///
/// Also accepted directly by [`load_block_map`](crate::grid::load_block_map) when the
/// pipeline is used outside of Bevy's asset server.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_blockmap_assets::prelude::*;
///
/// fn load(asset_server: Res<AssetServer>) {
///     let _map: Handle<BlockMapAsset> = asset_server.load_with_settings(
///         "maps/level1.tmj",
///         |settings: &mut BlockmapLoaderSettings| {
///             settings.unresolved_gid = UnresolvedGidPolicy::Fail;
///         },
///     );
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockmapLoaderSettings {
    /// Boolean layer property that marks the collision layer (default: `"collision"`)
    pub collision_property: String,

    /// Handling of tile ids that no tileset covers (default: [`UnresolvedGidPolicy::Empty`])
    pub unresolved_gid: UnresolvedGidPolicy,

    /// Fail the load when a tileset descriptor cannot be read (default: false)
    ///
    /// When false, a missing descriptor produces a degenerate tileset with zero
    /// tiles and no image, and the map still loads.
    pub strict_tilesets: bool,

    /// Filesystem location of the asset directory (default: `"assets"`)
    ///
    /// Linked tileset descriptors are read from disk relative to this root.
    pub asset_root: PathBuf,
}

impl Default for BlockmapLoaderSettings {
    fn default() -> Self {
        Self {
            collision_property: DEFAULT_COLLISION_PROPERTY.to_string(),
            unresolved_gid: UnresolvedGidPolicy::default(),
            strict_tilesets: false,
            asset_root: PathBuf::from("assets"),
        }
    }
}
