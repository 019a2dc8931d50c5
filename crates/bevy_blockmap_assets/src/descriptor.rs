//! Tileset descriptor (.tsx) extraction.
//!
//! Only three values matter to the block grid: the tile count, the column count and
//! the atlas image path. The descriptor is parsed with the `tiled` crate's TSX
//! parser, fed from memory so the caller controls file access, with a plain XML
//! scan as the fallback for descriptors that parser rejects.

use std::borrow::Cow;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Scalar fields pulled from a tileset descriptor.
///
/// `image` is the path exactly as written in the descriptor, relative to the
/// descriptor's own directory. A descriptor that could not be understood yields
/// [`TilesetDescriptor::default`]: zero counts and an empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilesetDescriptor {
    pub tile_count: u32,
    pub columns: u32,
    pub image: PathBuf,
}

impl TilesetDescriptor {
    /// True for the zero-valued fallback produced by unreadable descriptors.
    pub fn is_degenerate(&self) -> bool {
        self.tile_count == 0 && self.columns == 0 && self.image.as_os_str().is_empty()
    }
}

/// Serves a single descriptor's bytes to `tiled::Loader`.
///
/// Any other path the parser asks for (there should be none for a plain tileset)
/// is reported as not found.
struct InMemoryDescriptor {
    name: PathBuf,
    bytes: Vec<u8>,
}

impl tiled::ResourceReader for InMemoryDescriptor {
    type Resource = Cursor<Vec<u8>>;
    type Error = io::Error;

    fn read_from(&mut self, path: &Path) -> Result<Self::Resource, Self::Error> {
        if path == self.name {
            Ok(Cursor::new(self.bytes.clone()))
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not available to the descriptor reader", path.display()),
            ))
        }
    }
}

/// Extract tile count, column count and image path from descriptor text.
///
/// `path` is used for diagnostics and to name the in-memory source; the file is not
/// read. The parser sees only the file name, so the returned image path stays
/// relative to the descriptor's directory.
///
/// The `tiled` parser insists on attributes the block grid never uses (tile size,
/// image size). When it rejects a descriptor, the three fields are read straight
/// from the XML instead, each falling back to its own default.
pub fn extract_descriptor(path: &Path, text: &str) -> TilesetDescriptor {
    let name = path
        .file_name()
        .map_or_else(|| PathBuf::from("tileset.tsx"), PathBuf::from);

    let mut loader = tiled::Loader::with_reader(InMemoryDescriptor {
        name: name.clone(),
        bytes: text.as_bytes().to_vec(),
    });

    match loader.load_tsx_tileset(&name) {
        Ok(tileset) => TilesetDescriptor {
            tile_count: tileset.tilecount,
            columns: tileset.columns,
            image: tileset
                .image
                .as_ref()
                .map(|image| image.source.clone())
                .unwrap_or_default(),
        },
        Err(err) => {
            let descriptor = scan_descriptor(path, text);
            if descriptor.is_degenerate() {
                warn!(
                    "Tileset descriptor {} could not be parsed ({}), using an empty tileset",
                    path.display(),
                    err
                );
            } else {
                warn!(
                    "Tileset descriptor {} is incomplete ({}), read {} tiles in {} columns, image '{}'",
                    path.display(),
                    err,
                    descriptor.tile_count,
                    descriptor.columns,
                    descriptor.image.display()
                );
            }
            descriptor
        }
    }
}

/// Read `tilecount` and `columns` from the root `<tileset>` and `source` from its
/// first direct `<image>` child.
///
/// Anything missing or malformed keeps its default. A document whose root is not a
/// `<tileset>` yields the degenerate descriptor.
fn scan_descriptor(path: &Path, text: &str) -> TilesetDescriptor {
    let mut reader = Reader::from_str(text);
    let mut descriptor = TilesetDescriptor::default();
    let mut depth = 0usize;
    let mut found_image = false;

    loop {
        let (element, opens) = match reader.read_event() {
            Ok(Event::Start(element)) => (element, true),
            Ok(Event::Empty(element)) => (element, false),
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                continue;
            }
            Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(err) => {
                debug!(
                    "Stopped reading descriptor {} at byte {}: {}",
                    path.display(),
                    reader.buffer_position(),
                    err
                );
                break;
            }
        };

        match depth {
            0 if element.local_name().as_ref() != b"tileset" => {
                return TilesetDescriptor::default();
            }
            0 => {
                descriptor.tile_count = numeric_attribute(&element, "tilecount");
                descriptor.columns = numeric_attribute(&element, "columns");
            }
            1 if !found_image && element.local_name().as_ref() == b"image" => {
                found_image = true;
                if let Some(source) = attribute(&element, "source") {
                    descriptor.image = PathBuf::from(source);
                }
            }
            _ => {}
        }

        if opens {
            depth += 1;
        }
    }

    descriptor
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    let attribute = element.try_get_attribute(name).ok()??;
    attribute.unescape_value().ok().map(Cow::into_owned)
}

fn numeric_attribute(element: &BytesStart<'_>, name: &str) -> u32 {
    attribute(element, name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND_TSX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="ground" tilewidth="16" tileheight="16" tilecount="10" columns="5">
 <image source="ground.png" width="80" height="32"/>
</tileset>"#;

    #[test]
    fn test_extracts_counts_and_image() {
        let descriptor = extract_descriptor(Path::new("tilesets/ground.tsx"), GROUND_TSX);

        assert_eq!(descriptor.tile_count, 10);
        assert_eq!(descriptor.columns, 5);
        assert_eq!(descriptor.image, PathBuf::from("ground.png"));
        assert!(!descriptor.is_degenerate());
    }

    #[test]
    fn test_image_path_stays_relative() {
        let text = GROUND_TSX.replace("ground.png", "../images/ground.png");
        let descriptor = extract_descriptor(Path::new("/abs/tilesets/ground.tsx"), &text);

        assert_eq!(descriptor.image, PathBuf::from("../images/ground.png"));
    }

    #[test]
    fn test_unrecognized_text_is_degenerate() {
        let descriptor = extract_descriptor(Path::new("broken.tsx"), "this is not a tileset");

        assert_eq!(descriptor, TilesetDescriptor::default());
        assert!(descriptor.is_degenerate());
    }

    #[test]
    fn test_wrong_root_element_is_degenerate() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" width="1" height="1" tilewidth="16" tileheight="16"/>"#;
        let descriptor = extract_descriptor(Path::new("map.tsx"), text);

        assert!(descriptor.is_degenerate());
    }

    #[test]
    fn test_image_without_size_keeps_fields() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="ground" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="ground.png"/>
</tileset>"#;
        let descriptor = extract_descriptor(Path::new("ground.tsx"), text);

        assert_eq!(descriptor.tile_count, 4);
        assert_eq!(descriptor.columns, 2);
        assert_eq!(descriptor.image, PathBuf::from("ground.png"));
    }

    #[test]
    fn test_missing_tile_size_keeps_fields() {
        let text = r#"<tileset name="ground" tilecount="6" columns="3">
 <image source="../images/ground.png" width="48" height="32"/>
</tileset>"#;
        let descriptor = extract_descriptor(Path::new("ground.tsx"), text);

        assert_eq!(descriptor.tile_count, 6);
        assert_eq!(descriptor.columns, 3);
        assert_eq!(descriptor.image, PathBuf::from("../images/ground.png"));
    }

    #[test]
    fn test_malformed_field_degrades_alone() {
        let text = r#"<tileset name="ground" tilecount="6" columns="three">
 <image source="ground.png"/>
</tileset>"#;
        let descriptor = extract_descriptor(Path::new("ground.tsx"), text);

        assert_eq!(descriptor.tile_count, 6);
        assert_eq!(descriptor.columns, 0);
        assert_eq!(descriptor.image, PathBuf::from("ground.png"));
    }

    #[test]
    fn test_tileset_image_wins_over_tile_images() {
        let full = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="ground" tilewidth="16" tileheight="16" tilecount="2" columns="2">
 <image source="atlas.png" width="32" height="16"/>
 <tile id="0">
  <image source="tile0.png" width="16" height="16"/>
 </tile>
</tileset>"#;
        let partial = r#"<tileset name="ground" tilecount="2" columns="2">
 <tile id="0">
  <image source="tile0.png"/>
 </tile>
 <image source="atlas.png"/>
 <tile id="1">
  <image source="tile1.png"/>
 </tile>
</tileset>"#;

        for text in [full, partial] {
            let descriptor = extract_descriptor(Path::new("ground.tsx"), text);
            assert_eq!(descriptor.image, PathBuf::from("atlas.png"));
            assert_eq!(descriptor.tile_count, 2);
        }
    }
}
