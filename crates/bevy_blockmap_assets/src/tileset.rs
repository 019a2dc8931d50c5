//! Tileset records and their resolution from a map's tileset references.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use normalize_path::NormalizePath;

use crate::config::BlockmapLoaderSettings;
use crate::descriptor::extract_descriptor;
use crate::document::TilesetReference;
use crate::reader::read_text;
use crate::MapLoadError;

/// Loads the image behind a tileset.
///
/// The Bevy loader implements this over its `LoadContext`, so every tileset image
/// becomes a dependency of the map asset. The path is a resolved filesystem path.
pub trait ImageSource {
    fn load_image(&mut self, path: &Path) -> Handle<Image>;
}

/// One image-backed family of tiles, resolved for a specific map.
#[derive(Debug, Clone)]
pub struct Tileset {
    /// Smallest global id this tileset is responsible for
    pub first_gid: u32,

    /// Tiles per row in the atlas image
    pub columns: u32,

    /// Total tiles in the atlas image
    pub tile_count: u32,

    /// Resolved atlas image path (empty when the descriptor named none)
    pub image_path: PathBuf,

    /// Handle to the atlas image, `None` when `image_path` is empty
    pub image: Option<Handle<Image>>,

    /// Descriptor file this tileset came from, `None` for embedded tilesets
    pub source: Option<PathBuf>,
}

impl Tileset {
    /// A tileset with no tiles and no image, used when the descriptor is unusable.
    pub fn degenerate(first_gid: u32, source: Option<PathBuf>) -> Self {
        Self {
            first_gid,
            columns: 0,
            tile_count: 0,
            image_path: PathBuf::new(),
            image: None,
            source,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.tile_count == 0 && self.columns == 0 && self.image.is_none()
    }

    /// Atlas dimensions in tiles as (columns, rows).
    ///
    /// `UVec2::ZERO` when the column count is unknown.
    pub fn grid_size(&self) -> UVec2 {
        if self.columns > 0 {
            UVec2::new(self.columns, self.tile_count.div_ceil(self.columns))
        } else {
            UVec2::ZERO
        }
    }

    /// Whether a local tile type (1-based) exists in this tileset.
    pub fn contains_local(&self, tile_type: u32) -> bool {
        (1..=self.tile_count).contains(&tile_type)
    }

    /// 0-based atlas index of a local tile type.
    pub fn atlas_index(&self, tile_type: u32) -> Option<u32> {
        self.contains_local(tile_type).then(|| tile_type - 1)
    }

    /// Atlas cell (column, row) of a local tile type, counted from the image's top left.
    pub fn atlas_position(&self, tile_type: u32) -> Option<UVec2> {
        if self.columns == 0 {
            return None;
        }
        let index = self.atlas_index(tile_type)?;
        Some(UVec2::new(index % self.columns, index / self.columns))
    }
}

/// Resolve every tileset reference of the map at `map_path`, in input order.
///
/// Descriptor paths are relative to the map's directory and image paths relative to
/// the descriptor's directory. Each tileset with an image triggers exactly one
/// [`ImageSource::load_image`] call.
///
/// # Errors
///
/// * [`MapLoadError::DuplicateFirstGid`] if two references share a first gid
/// * [`MapLoadError::TilesetUnavailable`] if `settings.strict_tilesets` is set and a
///   descriptor is missing or unrecognizable
pub fn resolve_tilesets(
    map_path: &Path,
    references: &[TilesetReference],
    images: &mut impl ImageSource,
    settings: &BlockmapLoaderSettings,
) -> Result<Vec<Tileset>, MapLoadError> {
    let map_dir = parent_dir(map_path);
    let mut seen = HashSet::with_capacity(references.len());
    let mut tilesets = Vec::with_capacity(references.len());

    for reference in references {
        if !seen.insert(reference.first_gid) {
            return Err(MapLoadError::DuplicateFirstGid(reference.first_gid));
        }

        let tileset = match &reference.source {
            Some(source) => {
                resolve_external(map_dir, source, reference.first_gid, images, settings)?
            }
            None => resolve_embedded(map_dir, reference, images),
        };
        tilesets.push(tileset);
    }

    Ok(tilesets)
}

fn resolve_external(
    map_dir: &Path,
    source: &str,
    first_gid: u32,
    images: &mut impl ImageSource,
    settings: &BlockmapLoaderSettings,
) -> Result<Tileset, MapLoadError> {
    let descriptor_path = map_dir.join(source).normalize();

    let Some(text) = read_text(&descriptor_path) else {
        if settings.strict_tilesets {
            return Err(MapLoadError::TilesetUnavailable(descriptor_path));
        }
        warn!(
            "Tileset descriptor {} is missing or unreadable, using an empty tileset",
            descriptor_path.display()
        );
        return Ok(Tileset::degenerate(first_gid, Some(descriptor_path)));
    };

    let descriptor = extract_descriptor(&descriptor_path, &text);
    if descriptor.is_degenerate() && settings.strict_tilesets {
        return Err(MapLoadError::TilesetUnavailable(descriptor_path));
    }

    let image_path = anchor(parent_dir(&descriptor_path), &descriptor.image);
    let image = load_image(images, &image_path);
    debug!(
        "Resolved tileset {} (first gid {}, {} tiles in {} columns)",
        descriptor_path.display(),
        first_gid,
        descriptor.tile_count,
        descriptor.columns
    );

    Ok(Tileset {
        first_gid,
        columns: descriptor.columns,
        tile_count: descriptor.tile_count,
        image_path,
        image,
        source: Some(descriptor_path),
    })
}

fn resolve_embedded(
    map_dir: &Path,
    reference: &TilesetReference,
    images: &mut impl ImageSource,
) -> Tileset {
    let image_path = reference
        .image
        .as_deref()
        .map(|image| anchor(map_dir, Path::new(image)))
        .unwrap_or_default();
    let image = load_image(images, &image_path);

    Tileset {
        first_gid: reference.first_gid,
        columns: reference.columns.unwrap_or(0),
        tile_count: reference.tile_count.unwrap_or(0),
        image_path,
        image,
        source: None,
    }
}

/// Join `relative` onto `dir`, keeping an empty path empty.
fn anchor(dir: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        PathBuf::new()
    } else {
        dir.join(relative).normalize()
    }
}

fn load_image(images: &mut impl ImageSource, path: &Path) -> Option<Handle<Image>> {
    (!path.as_os_str().is_empty()).then(|| images.load_image(path))
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingImages, write_tsx};

    fn external(first_gid: u32, source: &str) -> TilesetReference {
        TilesetReference {
            first_gid,
            source: Some(source.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_relative_to_referencing_files() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("maps/level.tmj");
        write_tsx(&dir.path().join("tilesets/ground.tsx"), 10, 5, "../images/ground.png");

        let mut images = RecordingImages::default();
        let tilesets = resolve_tilesets(
            &map_path,
            &[external(1, "../tilesets/ground.tsx")],
            &mut images,
            &BlockmapLoaderSettings::default(),
        )
        .unwrap();

        assert_eq!(tilesets.len(), 1);
        let tileset = &tilesets[0];
        assert_eq!(tileset.first_gid, 1);
        assert_eq!(tileset.tile_count, 10);
        assert_eq!(tileset.columns, 5);
        assert_eq!(tileset.image_path, dir.path().join("images/ground.png"));
        assert_eq!(tileset.source, Some(dir.path().join("tilesets/ground.tsx")));
        assert!(tileset.image.is_some());
        assert_eq!(images.loaded, vec![dir.path().join("images/ground.png")]);
    }

    #[test]
    fn test_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("level.tmj");
        write_tsx(&dir.path().join("b.tsx"), 4, 2, "b.png");
        write_tsx(&dir.path().join("a.tsx"), 8, 4, "a.png");

        let mut images = RecordingImages::default();
        let tilesets = resolve_tilesets(
            &map_path,
            &[external(9, "b.tsx"), external(1, "a.tsx")],
            &mut images,
            &BlockmapLoaderSettings::default(),
        )
        .unwrap();

        let first_gids: Vec<_> = tilesets.iter().map(|t| t.first_gid).collect();
        assert_eq!(first_gids, [9, 1]);
        assert_eq!(
            images.loaded,
            vec![dir.path().join("b.png"), dir.path().join("a.png")]
        );
    }

    #[test]
    fn test_missing_descriptor_is_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let mut images = RecordingImages::default();

        let tilesets = resolve_tilesets(
            &dir.path().join("level.tmj"),
            &[external(1, "nowhere.tsx")],
            &mut images,
            &BlockmapLoaderSettings::default(),
        )
        .unwrap();

        assert!(tilesets[0].is_degenerate());
        assert_eq!(tilesets[0].tile_count, 0);
        assert_eq!(tilesets[0].columns, 0);
        assert!(images.loaded.is_empty());
    }

    #[test]
    fn test_missing_descriptor_fails_when_strict() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BlockmapLoaderSettings {
            strict_tilesets: true,
            ..Default::default()
        };

        let err = resolve_tilesets(
            &dir.path().join("level.tmj"),
            &[external(1, "nowhere.tsx")],
            &mut RecordingImages::default(),
            &settings,
        )
        .unwrap_err();

        assert!(matches!(err, MapLoadError::TilesetUnavailable(_)));
    }

    #[test]
    fn test_duplicate_first_gid_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_tilesets(
            &dir.path().join("level.tmj"),
            &[external(1, "a.tsx"), external(1, "b.tsx")],
            &mut RecordingImages::default(),
            &BlockmapLoaderSettings::default(),
        )
        .unwrap_err();

        assert!(matches!(err, MapLoadError::DuplicateFirstGid(1)));
    }

    #[test]
    fn test_embedded_tileset() {
        let dir = tempfile::tempdir().unwrap();
        let reference = TilesetReference {
            first_gid: 3,
            source: None,
            tile_count: Some(6),
            columns: Some(3),
            image: Some("art/props.png".to_string()),
        };

        let mut images = RecordingImages::default();
        let tilesets = resolve_tilesets(
            &dir.path().join("maps/level.tmj"),
            &[reference],
            &mut images,
            &BlockmapLoaderSettings::default(),
        )
        .unwrap();

        assert_eq!(tilesets[0].tile_count, 6);
        assert_eq!(tilesets[0].columns, 3);
        assert_eq!(tilesets[0].source, None);
        assert_eq!(images.loaded, vec![dir.path().join("maps/art/props.png")]);
    }

    #[test]
    fn test_grid_and_atlas_positions() {
        let tileset = Tileset {
            first_gid: 1,
            columns: 5,
            tile_count: 12,
            image_path: PathBuf::from("a.png"),
            image: None,
            source: None,
        };

        assert_eq!(tileset.grid_size(), UVec2::new(5, 3));
        assert_eq!(tileset.atlas_index(1), Some(0));
        assert_eq!(tileset.atlas_position(7), Some(UVec2::new(1, 1)));
        assert_eq!(tileset.atlas_position(12), Some(UVec2::new(1, 2)));
        assert_eq!(tileset.atlas_index(0), None);
        assert_eq!(tileset.atlas_index(13), None);
        assert_eq!(Tileset::degenerate(1, None).grid_size(), UVec2::ZERO);
    }
}
