//! Fixtures shared by the pipeline tests.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::tileset::ImageSource;

/// Records requested image paths instead of loading them.
#[derive(Default)]
pub struct RecordingImages {
    pub loaded: Vec<PathBuf>,
}

impl ImageSource for RecordingImages {
    fn load_image(&mut self, path: &Path) -> Handle<Image> {
        self.loaded.push(path.to_path_buf());
        Handle::default()
    }
}

/// Write a minimal Tiled tileset descriptor, creating parent directories.
pub fn write_tsx(path: &Path, tile_count: u32, columns: u32, image: &str) {
    let rows = tile_count.div_ceil(columns.max(1));
    let text = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="fixture" tilewidth="16" tileheight="16" tilecount="{tile_count}" columns="{columns}">
 <image source="{image}" width="{}" height="{}"/>
</tileset>
"#,
        columns * 16,
        rows * 16
    );
    write_file(path, &text);
}

pub fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}
