//! Basic example demonstrating loading a block map
//!
//! Loads `assets/maps/level1.tmj`, prints its layers, tilesets and collision layer,
//! then draws the collision layer as ASCII.
//!
//! Run with: `cargo run -p bevy_blockmap_assets --example basic_loading`

use std::path::PathBuf;

use bevy::{log::LogPlugin, prelude::*};
use bevy_blockmap_assets::prelude::*;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            LogPlugin::default(),
            ImagePlugin::default(),
        ))
        .add_plugins(BlockmapAssetsPlugin)
        .add_systems(Startup, load_map)
        .add_systems(Update, check_map_loaded)
        .run();
}

#[derive(Resource)]
struct LoadedMap(Handle<BlockMapAsset>);

fn load_map(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("Loading block map...");

    // Bevy resolves assets against the crate directory, descriptors are read from disk
    let asset_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let map = asset_server.load_with_settings(
        "maps/level1.tmj",
        move |settings: &mut BlockmapLoaderSettings| {
            settings.asset_root = asset_root.clone();
        },
    );

    commands.insert_resource(LoadedMap(map));
}

fn check_map_loaded(
    loaded: Res<LoadedMap>,
    maps: Res<Assets<BlockMapAsset>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(asset) = maps.get(&loaded.0) else {
        return;
    };
    let map = &asset.map;

    info!("🗺️  MAP: {}", asset.source.display());
    info!("  Dimensions: {}x{} blocks", map.width, map.height);
    info!("  Layers: {}", map.layer_count());
    for (index, layer) in map.layers.iter().enumerate() {
        info!(
            "    - [{}] '{}' with {} blocks",
            index,
            layer.name,
            layer.block_count()
        );
    }

    info!("  Tilesets: {}", map.tilesets.len());
    for tileset in &map.tilesets {
        info!(
            "    - First GID {}: {} tiles, grid {:?}, image {}",
            tileset.first_gid,
            tileset.tile_count,
            tileset.grid_size(),
            tileset.image_path.display()
        );
    }

    match map.collision_layer {
        Some(layer) => {
            info!("  Collision layer: {}", layer);
            // Top row first so the output reads like the map editor
            for y in (0..map.height as i32).rev() {
                let row: String = (0..map.width as i32)
                    .map(|x| if map.is_solid(x, y) { '#' } else { '.' })
                    .collect();
                info!("    {}", row);
            }
        }
        None => info!("  No collision layer"),
    }

    exit.write(AppExit::Success);
}
