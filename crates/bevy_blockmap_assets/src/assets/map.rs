use std::path::PathBuf;

use bevy::prelude::*;

use crate::grid::BlockMap;

/// Bevy asset wrapper for a loaded block map (.tmj / .map.json files)
#[derive(TypePath, Asset, Debug)]
pub struct BlockMapAsset {
    /// The resolved block grid and its tilesets
    pub map: BlockMap,

    /// Filesystem path the map was read from
    pub source: PathBuf,
}

impl BlockMapAsset {
    /// Atlas image handles of all tilesets that have one, in tileset order.
    pub fn images(&self) -> impl Iterator<Item = &Handle<Image>> {
        self.map
            .tilesets
            .iter()
            .filter_map(|tileset| tileset.image.as_ref())
    }
}
