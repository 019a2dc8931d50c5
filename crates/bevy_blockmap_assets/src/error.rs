use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a block map load.
///
/// Tolerated problems (unreadable tileset descriptors, unresolvable tile ids under the
/// default policy) never show up here; they are logged and degrade instead.
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed map document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Map file is missing or unreadable: {0}")]
    MapUnavailable(PathBuf),

    #[error("Tile layer '{layer}' has no data array")]
    MissingLayerData { layer: String },

    #[error("Tile layer '{layer}' has {actual} cells, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },

    #[error("Property '{property}' on layer '{layer}' is not a boolean")]
    InvalidProperty { layer: String, property: String },

    #[error("Two tilesets share first gid {0}")]
    DuplicateFirstGid(u32),

    #[error("Tileset descriptor is missing or unreadable: {0}")]
    TilesetUnavailable(PathBuf),

    #[error("Tile id {gid} in layer '{layer}' is below every tileset's first gid")]
    UnresolvedGid { layer: String, gid: u32 },

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
