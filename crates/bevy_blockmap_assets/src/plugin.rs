use bevy::prelude::*;

use crate::assets::map::BlockMapAsset;
use crate::loaders::map::BlockMapAssetLoader;

/// Plugin that registers the block map asset type and its loader
///
/// This plugin enables loading JSON block maps (.tmj, .map.json) as Bevy assets.
/// Loader behavior is tuned per load through [`BlockmapLoaderSettings`](crate::BlockmapLoaderSettings).
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_blockmap_assets::BlockmapAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(BlockmapAssetsPlugin)
///     .run();
/// ```
///
/// # What this plugin does NOT do
///
/// - Rendering the block grid
/// - Physics or player collision response
pub struct BlockmapAssetsPlugin;

impl Plugin for BlockmapAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<BlockMapAsset>()
            .register_asset_loader(BlockMapAssetLoader);
    }
}
