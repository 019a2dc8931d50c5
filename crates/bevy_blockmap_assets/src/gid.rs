//! Global tile id resolution.
//!
//! A raw cell value is a global id: it may point into any of the map's tilesets.
//! Each tileset owns the ids from its first gid up to the next tileset's first gid.

use crate::tileset::Tileset;

const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
const ROTATED_HEXAGONAL_120: u32 = 0x1000_0000;
const FLAG_MASK: u32 =
    FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY | ROTATED_HEXAGONAL_120;

/// Flip flags Tiled stores in the high bits of a global id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TileFlip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl TileFlip {
    /// No flags set.
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    /// Split a raw cell value into its bare global id and flip flags.
    ///
    /// The hexagonal rotation bit is stripped but not reported.
    pub const fn split(raw: u32) -> (u32, Self) {
        let flip = Self {
            horizontal: raw & FLIPPED_HORIZONTALLY != 0,
            vertical: raw & FLIPPED_VERTICALLY != 0,
            diagonal: raw & FLIPPED_DIAGONALLY != 0,
        };
        (raw & !FLAG_MASK, flip)
    }

    pub const fn is_none(&self) -> bool {
        !(self.horizontal || self.vertical || self.diagonal)
    }
}

/// The owner of a global id and the id's position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGid {
    /// Index into the map's tileset list
    pub tileset: usize,
    /// Local tile type, 1-based (`gid - first_gid + 1`)
    pub tile_type: u32,
}

/// Resolve a bare global id against the map's tilesets.
///
/// Picks the tileset with the greatest first gid that is still `<= gid`. Returns
/// `None` for `gid == 0` (no tile) and for ids below every first gid. Tileset order
/// does not matter.
pub fn resolve_gid(gid: u32, tilesets: &[Tileset]) -> Option<ResolvedGid> {
    if gid == 0 {
        return None;
    }

    tilesets
        .iter()
        .enumerate()
        .filter(|(_, tileset)| tileset.first_gid <= gid)
        .max_by_key(|(_, tileset)| tileset.first_gid)
        .map(|(index, tileset)| ResolvedGid {
            tileset: index,
            tile_type: gid - tileset.first_gid + 1,
        })
}
