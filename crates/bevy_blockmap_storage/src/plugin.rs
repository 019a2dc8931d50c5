use bevy::prelude::*;

use crate::cache::SharedDocumentCache;

/// Configuration for [`BlockmapStoragePlugin`].
#[derive(Resource, Debug, Clone)]
pub struct StorageConfig {
    /// Save every cached document when the app exits (default: true)
    pub save_on_exit: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { save_on_exit: true }
    }
}

/// Plugin that provides a shared [`DocumentCache`](crate::DocumentCache) resource
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_blockmap_storage::prelude::*;
///
/// fn read_options(cache: Res<SharedDocumentCache>) {
///     if let Ok(options) = cache.lock().load("assets/options.json") {
///         let _volume = options["volume"].as_f64();
///     }
/// }
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(BlockmapStoragePlugin::default())
///     .add_systems(Startup, read_options)
///     .run();
/// ```
#[derive(Default)]
pub struct BlockmapStoragePlugin {
    config: StorageConfig,
}

impl BlockmapStoragePlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl Plugin for BlockmapStoragePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone());
        app.init_resource::<SharedDocumentCache>();

        if self.config.save_on_exit {
            app.add_systems(Last, save_documents_on_exit);
        }
    }
}

/// Writes all cached documents back once an `AppExit` message is seen.
fn save_documents_on_exit(mut exits: MessageReader<AppExit>, cache: Res<SharedDocumentCache>) {
    if exits.read().count() == 0 {
        return;
    }

    let report = cache.lock().save_all();
    if report.is_complete() {
        info!(
            "Saved {} cached documents on exit ({} skipped)",
            report.written,
            report.skipped.len()
        );
    } else {
        error!(
            "Saved {} cached documents on exit ({} skipped, {} failed)",
            report.written,
            report.skipped.len(),
            report.failed.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_inserts_resources() {
        let mut app = App::new();
        app.add_plugins(BlockmapStoragePlugin::new(StorageConfig {
            save_on_exit: false,
        }));

        assert!(app.world().contains_resource::<SharedDocumentCache>());
        assert!(!app.world().resource::<StorageConfig>().save_on_exit);
    }
}
