use std::io;
use std::path::Path;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
    tasks::ConditionalSendFuture,
};
use normalize_path::NormalizePath;

use crate::assets::map::BlockMapAsset;
use crate::config::BlockmapLoaderSettings;
use crate::grid::load_block_map_from_str;
use crate::tileset::ImageSource;
use crate::MapLoadError;

/// Asset loader for JSON block maps (.tmj / .map.json files)
///
/// The map document comes through Bevy's reader. Linked tileset descriptors are
/// read from disk under [`BlockmapLoaderSettings::asset_root`], and every tileset
/// image is loaded as a dependency through the asset server.
#[derive(Default)]
pub struct BlockMapAssetLoader;

impl AssetLoader for BlockMapAssetLoader {
    type Asset = BlockMapAsset;
    type Settings = BlockmapLoaderSettings;
    type Error = MapLoadError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let text = String::from_utf8(bytes)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

            // Tileset paths in the document are relative to the map's location on disk
            let asset_root = settings.asset_root.normalize();
            let map_path = asset_root.join(load_context.asset_path().path());

            let mut images = LoadContextImages {
                load_context: &mut *load_context,
                asset_root: &asset_root,
            };
            let map = load_block_map_from_str(&map_path, &text, &mut images, settings)?;

            Ok(BlockMapAsset {
                map,
                source: map_path,
            })
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmj", "map.json"]
    }
}

/// Loads tileset images as dependencies of the map being loaded.
struct LoadContextImages<'a, 'ctx> {
    load_context: &'a mut LoadContext<'ctx>,
    asset_root: &'a Path,
}

impl ImageSource for LoadContextImages<'_, '_> {
    fn load_image(&mut self, path: &Path) -> Handle<Image> {
        let asset_path = to_asset_path(self.asset_root, path);
        self.load_context.load(asset_path)
    }
}

/// Convert a filesystem path under `asset_root` to a Bevy asset path
///
/// Paths outside the root are passed through unchanged. Separators are normalized
/// to forward slashes.
fn to_asset_path(asset_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(asset_root).unwrap_or(path);
    relative
        .normalize()
        .to_string_lossy()
        .replace('\\', "/")
}
