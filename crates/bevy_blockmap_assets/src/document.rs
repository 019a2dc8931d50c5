//! JSON map document parsing.
//!
//! Mirrors the subset of the Tiled JSON map format the block grid needs. Everything
//! else in the document (object layers, editor metadata, render order, ...) is
//! ignored by serde.

use serde::Deserialize;
use serde_json::Value;

use crate::MapLoadError;

/// Layer `type` value of the only layers kept in the grid.
pub const TILE_LAYER_KIND: &str = "tilelayer";

/// Root of a JSON map document.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDocument {
    /// Map width in cells
    pub width: u32,
    /// Map height in cells
    pub height: u32,
    #[serde(default)]
    pub layers: Vec<LayerDocument>,
    #[serde(default)]
    pub tilesets: Vec<TilesetReference>,
}

/// One entry of the document's `layers` array, of any kind.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// Flat, row-major cell values with the origin at the top left
    #[serde(default)]
    pub data: Option<Vec<u32>>,
    #[serde(default)]
    pub properties: Option<LayerProperties>,
}

impl LayerDocument {
    pub fn is_tile_layer(&self) -> bool {
        self.kind.eq_ignore_ascii_case(TILE_LAYER_KIND)
    }
}

/// Layer properties in either of the two shapes found in the wild.
///
/// Tiled writes a list of `{name, type, value}` entries; hand-written and older
/// documents often use a plain object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayerProperties {
    List(Vec<PropertyEntry>),
    Map(serde_json::Map<String, Value>),
}

impl LayerProperties {
    /// Look up a property value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            LayerProperties::List(entries) => entries
                .iter()
                .find(|entry| entry.name == name)
                .map(|entry| &entry.value),
            LayerProperties::Map(map) => map.get(name),
        }
    }
}

/// A single Tiled custom property.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// One entry of the document's `tilesets` array.
///
/// External tilesets carry `source`, a descriptor path relative to the map file.
/// Embedded tilesets carry their fields inline instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TilesetReference {
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "tilecount", default)]
    pub tile_count: Option<u32>,
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A retained tile layer, ready for grid construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub name: String,
    pub data: Vec<u32>,
    pub collision: bool,
}

/// The parts of a map document the grid builder consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMap {
    pub width: u32,
    pub height: u32,
    /// Tile layers only, in document order
    pub layers: Vec<TileLayer>,
    pub tilesets: Vec<TilesetReference>,
}

impl ParsedMap {
    /// Number of cells every tile layer holds.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Parse map document text into its tile layers and tileset references.
///
/// Non-tile layers are dropped. Every kept layer must have a `data` array of exactly
/// `width * height` cells, and `collision_property`, if present, must be a boolean.
pub fn parse_map_document(
    text: &str,
    collision_property: &str,
) -> Result<ParsedMap, MapLoadError> {
    let document: MapDocument = serde_json::from_str(text)?;
    let expected = document.width as usize * document.height as usize;

    let layers = document
        .layers
        .into_iter()
        .filter(LayerDocument::is_tile_layer)
        .map(|layer| {
            let collision = collision_flag(&layer, collision_property)?;
            let Some(data) = layer.data else {
                return Err(MapLoadError::MissingLayerData { layer: layer.name });
            };
            if data.len() != expected {
                return Err(MapLoadError::LayerSize {
                    layer: layer.name,
                    expected,
                    actual: data.len(),
                });
            }
            Ok(TileLayer {
                name: layer.name,
                data,
                collision,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedMap {
        width: document.width,
        height: document.height,
        layers,
        tilesets: document.tilesets,
    })
}

fn collision_flag(layer: &LayerDocument, property: &str) -> Result<bool, MapLoadError> {
    let Some(value) = layer
        .properties
        .as_ref()
        .and_then(|properties| properties.get(property))
    else {
        return Ok(false);
    };

    value.as_bool().ok_or_else(|| MapLoadError::InvalidProperty {
        layer: layer.name.clone(),
        property: property.to_string(),
    })
}
