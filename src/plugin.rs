//! Unified plugin for bevy_blockmap.

use bevy::prelude::*;

use bevy_blockmap_assets::BlockmapAssetsPlugin;

#[cfg(feature = "storage")]
use bevy_blockmap_storage::{BlockmapStoragePlugin, StorageConfig};

/// Unified plugin that adds all enabled bevy_blockmap functionality.
///
/// - Block map asset loading ([`BlockmapAssetsPlugin`])
/// - `storage` feature: the shared document cache ([`BlockmapStoragePlugin`])
///
/// # With Custom Configuration
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_blockmap::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         BevyBlockmapPlugin::default()
///             .with_storage(StorageConfig { save_on_exit: false })
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct BevyBlockmapPlugin {
    /// Storage configuration (if feature enabled)
    #[cfg(feature = "storage")]
    pub storage: StorageConfig,
}

impl BevyBlockmapPlugin {
    /// Create with custom storage configuration
    #[cfg(feature = "storage")]
    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }
}

impl Plugin for BevyBlockmapPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(BlockmapAssetsPlugin);

        #[cfg(feature = "storage")]
        app.add_plugins(BlockmapStoragePlugin::new(self.storage.clone()));

        info!("BevyBlockmapPlugin initialized");
    }
}
