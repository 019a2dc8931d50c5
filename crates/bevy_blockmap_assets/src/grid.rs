//! Layered block grid construction.
//!
//! Source documents store rows top to bottom; the block grid stores them bottom to
//! top, so `y = 0` is the lowest row of the world.

use std::path::Path;

use bevy::prelude::*;

use crate::config::{BlockmapLoaderSettings, UnresolvedGidPolicy};
use crate::document::{ParsedMap, parse_map_document};
use crate::gid::{TileFlip, resolve_gid};
use crate::reader::read_text;
use crate::tileset::{ImageSource, Tileset, resolve_tilesets};
use crate::MapLoadError;

/// A single placed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Column within the layer
    pub x: u32,
    /// Row within the layer, 0 at the bottom
    pub y: u32,
    /// Local tile type within its tileset, 1-based; 0 means no tile
    pub tile_type: u32,
    /// Index of the owning tileset in [`BlockMap::tilesets`]
    pub tileset: Option<usize>,
    /// Global id from the document, flip bits removed
    pub gid: u32,
    pub flip: TileFlip,
}

impl Block {
    /// The empty-block sentinel returned for unset and out-of-range cells.
    pub const EMPTY: Block = Block {
        x: 0,
        y: 0,
        tile_type: 0,
        tileset: None,
        gid: 0,
        flip: TileFlip::NONE,
    };

    pub fn is_empty(&self) -> bool {
        self.tile_type == 0
    }
}

static EMPTY_BLOCK: Block = Block::EMPTY;

/// One tile layer of a [`BlockMap`].
#[derive(Debug, Clone)]
pub struct BlockLayer {
    pub name: String,
    width: u32,
    height: u32,
    /// index = y * width + x, `None` = empty cell
    cells: Vec<Option<Block>>,
}

impl BlockLayer {
    fn empty(name: String, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the block at a position (None if out of bounds or empty).
    pub fn get(&self, x: u32, y: u32) -> Option<&Block> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y))?.as_ref()
    }

    fn set(&mut self, block: Block) {
        if block.x < self.width && block.y < self.height {
            let index = self.index(block.x, block.y);
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(block);
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Iterate all non-empty blocks, bottom row first.
    pub fn iter_blocks(&self) -> impl Iterator<Item = &Block> {
        self.cells.iter().flatten()
    }

    pub fn block_count(&self) -> usize {
        self.iter_blocks().count()
    }
}

/// A fully resolved map: block layers, their tilesets and the collision layer.
#[derive(Debug, Clone)]
pub struct BlockMap {
    /// Map width in blocks
    pub width: u32,
    /// Map height in blocks
    pub height: u32,
    /// Tile layers in document order
    pub layers: Vec<BlockLayer>,
    /// Tilesets in document order; [`Block::tileset`] indexes into this
    pub tilesets: Vec<Tileset>,
    /// Index of the layer flagged as the collision layer
    pub collision_layer: Option<usize>,
}

impl BlockMap {
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&BlockLayer> {
        self.layers.get(index)
    }

    /// Block at `[layer][x][y]`.
    ///
    /// Never fails: negative, out-of-range and empty cells all yield
    /// [`Block::EMPTY`].
    pub fn block_at(&self, layer: usize, x: i32, y: i32) -> &Block {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return &EMPTY_BLOCK;
        };
        self.layers
            .get(layer)
            .and_then(|layer| layer.get(x, y))
            .unwrap_or(&EMPTY_BLOCK)
    }

    /// Whether the collision layer holds a tile at `(x, y)`.
    ///
    /// Always false for maps without a collision layer.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.collision_layer
            .is_some_and(|layer| !self.block_at(layer, x, y).is_empty())
    }

    /// The tileset a block was resolved against.
    pub fn tileset_of(&self, block: &Block) -> Option<&Tileset> {
        self.tilesets.get(block.tileset?)
    }
}

/// Convert a source row (0 at the top) to an engine row (0 at the bottom).
///
/// The conversion is its own inverse. `None` when `row` is outside `0..height`.
pub fn flip_row(row: u32, height: u32) -> Option<u32> {
    height.checked_sub(row)?.checked_sub(1)
}

/// Engine coordinates of the `index`-th cell of a row-major source layer.
///
/// `None` when the index falls outside a `width * height` grid.
pub fn cell_position(index: usize, width: u32, height: u32) -> Option<(u32, u32)> {
    let width = width as usize;
    if width == 0 {
        return None;
    }
    let x = u32::try_from(index % width).ok()?;
    let row = u32::try_from(index / width).ok()?;
    Some((x, flip_row(row, height)?))
}

/// Build a block map from a parsed document and its resolved tilesets.
///
/// The collision layer is the lowest-index layer carrying the collision flag.
///
/// # Errors
///
/// * [`MapLoadError::LayerSize`] when a layer's cell count is not `width * height`
/// * [`MapLoadError::UnresolvedGid`] when a cell's id is below every first gid and
///   `settings.unresolved_gid` is [`UnresolvedGidPolicy::Fail`]
pub fn build_block_map(
    parsed: ParsedMap,
    tilesets: Vec<Tileset>,
    settings: &BlockmapLoaderSettings,
) -> Result<BlockMap, MapLoadError> {
    let ParsedMap {
        width,
        height,
        layers: source_layers,
        ..
    } = parsed;

    let expected = width as usize * height as usize;
    if let Some(layer) = source_layers
        .iter()
        .find(|layer| layer.data.len() != expected)
    {
        return Err(MapLoadError::LayerSize {
            layer: layer.name.clone(),
            expected,
            actual: layer.data.len(),
        });
    }

    let collision_layer = source_layers.iter().position(|layer| layer.collision);
    let mut layers = Vec::with_capacity(source_layers.len());

    for source in source_layers {
        let mut layer = BlockLayer::empty(source.name, width, height);
        let mut unresolved = 0usize;

        for (index, &raw) in source.data.iter().enumerate() {
            let (gid, flip) = TileFlip::split(raw);
            if gid == 0 {
                continue;
            }

            let Some(resolved) = resolve_gid(gid, &tilesets) else {
                match settings.unresolved_gid {
                    UnresolvedGidPolicy::Empty => {
                        unresolved += 1;
                        continue;
                    }
                    UnresolvedGidPolicy::Fail => {
                        return Err(MapLoadError::UnresolvedGid {
                            layer: layer.name,
                            gid,
                        });
                    }
                }
            };

            let Some((x, y)) = cell_position(index, width, height) else {
                continue;
            };
            layer.set(Block {
                x,
                y,
                tile_type: resolved.tile_type,
                tileset: Some(resolved.tileset),
                gid,
                flip,
            });
        }

        if unresolved > 0 {
            warn!(
                "Layer '{}' has {} tile ids outside every tileset, left empty",
                layer.name, unresolved
            );
        }
        layers.push(layer);
    }

    Ok(BlockMap {
        width,
        height,
        layers,
        tilesets,
        collision_layer,
    })
}

/// Load the map file at `map_path` into a block map.
///
/// # Errors
///
/// [`MapLoadError::MapUnavailable`] if the file cannot be read, plus everything
/// [`load_block_map_from_str`] can return.
pub fn load_block_map(
    map_path: &Path,
    images: &mut impl ImageSource,
    settings: &BlockmapLoaderSettings,
) -> Result<BlockMap, MapLoadError> {
    let text =
        read_text(map_path).ok_or_else(|| MapLoadError::MapUnavailable(map_path.to_path_buf()))?;
    load_block_map_from_str(map_path, &text, images, settings)
}

/// Load a block map from document text already read from `map_path`.
///
/// `map_path` anchors the relative tileset paths in the document.
pub fn load_block_map_from_str(
    map_path: &Path,
    text: &str,
    images: &mut impl ImageSource,
    settings: &BlockmapLoaderSettings,
) -> Result<BlockMap, MapLoadError> {
    let parsed = parse_map_document(text, &settings.collision_property)?;
    let tilesets = resolve_tilesets(map_path, &parsed.tilesets, images, settings)?;
    let map = build_block_map(parsed, tilesets, settings)?;

    info!(
        "Loaded block map {} ({}x{}, {} layers, {} tilesets)",
        map_path.display(),
        map.width,
        map.height,
        map.layer_count(),
        map.tilesets.len()
    );
    Ok(map)
}
