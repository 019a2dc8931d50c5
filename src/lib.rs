//! # bevy_blockmap
//!
//! Layered block maps for Bevy, loaded from JSON tile maps and `.tsx` tilesets.
//!
//! This is a unified meta-crate that combines the `bevy_blockmap_*` sub-crates with
//! feature flags.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_blockmap::prelude::*;
//!
//! #[derive(Resource)]
//! struct Level(Handle<BlockMapAsset>);
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyBlockmapPlugin::default())
//!         .add_systems(Startup, load_level)
//!         .run();
//! }
//!
//! fn load_level(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.insert_resource(Level(asset_server.load("maps/level1.tmj")));
//! }
//! ```
//!
//! ## Features
//!
//! - **default**: Includes `storage`
//! - **storage**: Shared JSON document cache with save-on-exit
//!
//! ## Architecture
//!
//! - [`assets`]: The map ingestion pipeline and its Bevy asset loader
//! - [`storage`]: Path-keyed document cache and persistence

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_blockmap_assets as assets;

#[cfg(feature = "storage")]
pub use bevy_blockmap_storage as storage;

/// Unified prelude for bevy_blockmap
pub mod prelude {
    pub use crate::assets::prelude::*;

    #[cfg(feature = "storage")]
    pub use crate::storage::prelude::*;

    pub use crate::plugin::BevyBlockmapPlugin;
}
