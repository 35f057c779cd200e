//! Map configuration: viewport, data sources and styled layers.
//!
//! A [`MapConfig`] is built once by whoever bootstraps the page and then
//! passed explicitly to the map view; nothing here is global.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    nav::{NavScroll, DEFAULT_NAV_OFFSET, DEFAULT_SCROLL_DURATION_MS},
    popup::PopupTemplate,
    template::{placeholder_names, MissingPropertyPolicy},
};

/// Highest zoom level Mapbox GL accepts.
pub const MAX_ZOOM: f64 = 24.0;

const DEFAULT_CONTAINER: &str = "map";
const DEFAULT_STYLE: &str = "basic";
const STOCK_STYLE_PREFIX: &str = "mapbox://styles/mapbox/";
const STOCK_STYLE_VERSION: &str = "-v9";
const FORBIDDEN_POPUP_SEQUENCE: &str = "{};";

/// Errors raised while loading a map configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`MapConfig`].
    #[error("invalid map config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but failed validation.
    #[error("map config has {} problem(s): {}", .0.len(), join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One problem found by [`MapConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    /// A source has an empty name.
    #[error("source #{index} has an empty name")]
    EmptySourceName {
        /// Position in `sources`.
        index: usize,
    },
    /// Two sources share a name.
    #[error("duplicate source name `{0}`")]
    DuplicateSource(String),
    /// A layer has an empty id.
    #[error("layer #{index} has an empty id")]
    EmptyLayerId {
        /// Position in `layers`.
        index: usize,
    },
    /// Two layers share an id.
    #[error("duplicate layer id `{0}`")]
    DuplicateLayer(String),
    /// A layer points at a source that is not configured.
    #[error("layer `{layer}` references unknown source `{source_name}`")]
    UnknownSource {
        /// Layer id.
        layer: String,
        /// Missing source name.
        source_name: String,
    },
    /// Zoom is outside `0..=24`.
    #[error("zoom {0} is outside 0..=24")]
    ZoomOutOfRange(f64),
    /// Center is not a valid longitude/latitude pair.
    #[error("center [{lng}, {lat}] is not a valid longitude/latitude")]
    CenterOutOfRange {
        /// Longitude.
        lng: f64,
        /// Latitude.
        lat: f64,
    },
    /// A popup field contains the `{};` sequence.
    #[error("popup of layer `{layer}` contains the forbidden sequence `{{}};` in `{field}`")]
    ForbiddenPopupSequence {
        /// Layer id.
        layer: String,
        /// Offending field template.
        field: String,
    },
    /// A popup field has more than one marker; only the first is filled.
    #[error("popup of layer `{layer}` has {count} placeholders in `{field}`, only the first is filled")]
    MultiplePlaceholders {
        /// Layer id.
        layer: String,
        /// Offending field template.
        field: String,
        /// Number of markers found.
        count: usize,
    },
}

/// Where a source's data lives and how Mapbox should read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceData {
    /// Mapbox source type, e.g. `geojson` or `vector`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Data URL.
    pub file: String,
}

/// A named data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source id used by layers.
    pub name: String,
    /// Source type and location.
    pub data: SourceData,
}

impl SourceConfig {
    /// Object passed as the second argument of `map.addSource`.
    pub fn descriptor(&self) -> Value {
        json!({
            "type": self.data.kind,
            "data": self.data.file,
        })
    }
}

/// A styled layer drawn from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Unique layer id.
    pub id: String,
    /// Mapbox layer type (`fill`, `line`, `circle`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the source feeding this layer.
    pub source: String,
    /// Layer inside a vector tile source.
    #[serde(rename = "source-layer", default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    /// Mapbox layout properties.
    #[serde(default = "empty_object")]
    pub layout: Value,
    /// Mapbox paint properties.
    #[serde(default = "empty_object")]
    pub paint: Value,
    /// Popup shown when one of the layer's features is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<PopupTemplate>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl LayerConfig {
    /// Object passed to `map.addLayer`.
    pub fn descriptor(&self) -> Value {
        let mut layer = json!({
            "id": self.id,
            "type": self.kind,
            "source": self.source,
            "layout": self.layout,
            "paint": self.paint,
        });
        if let (Some(source_layer), Value::Object(fields)) = (&self.source_layer, &mut layer) {
            fields.insert("source-layer".to_string(), Value::String(source_layer.clone()));
        }
        layer
    }
}

/// Geographic position as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lng, self.lat)
    }
}

/// Everything needed to draw one map page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Mapbox access token.
    #[serde(default)]
    pub access_token: String,
    /// Id of the element the map is mounted in.
    #[serde(default = "default_container")]
    pub container: String,
    /// Stock style name or full style URL.
    #[serde(default = "default_style")]
    pub style: String,
    /// Initial center.
    #[serde(default)]
    pub center: LngLat,
    /// Initial zoom.
    #[serde(default)]
    pub zoom: f64,
    /// Data sources, added in order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Layers, added in order.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// How popups handle markers naming absent properties.
    #[serde(default)]
    pub missing_property: MissingPropertyPolicy,
    /// Fixed header height subtracted from nav scroll targets.
    #[serde(default = "default_nav_offset")]
    pub nav_offset: f64,
    /// Duration hint for nav scrolling.
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: u32,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_nav_offset() -> f64 {
    DEFAULT_NAV_OFFSET
}

fn default_scroll_duration() -> u32 {
    DEFAULT_SCROLL_DURATION_MS
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            container: default_container(),
            style: default_style(),
            center: LngLat::default(),
            zoom: 0.0,
            sources: Vec::new(),
            layers: Vec::new(),
            missing_property: MissingPropertyPolicy::default(),
            nav_offset: DEFAULT_NAV_OFFSET,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
        }
    }
}

impl MapConfig {
    /// Parses a JSON document without validating it.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses an already decoded JSON value without validating it.
    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parses and validates in one step.
    pub fn load(raw: &str) -> Result<Self, ConfigError> {
        let config = Self::from_json_str(raw)?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Style URL handed to `mapboxgl.Map`.
    pub fn style_url(&self) -> String {
        if self.style.contains("://") {
            self.style.clone()
        } else {
            format!("{STOCK_STYLE_PREFIX}{}{STOCK_STYLE_VERSION}", self.style)
        }
    }

    /// Options object for the `mapboxgl.Map` constructor.
    pub fn map_options(&self) -> Value {
        json!({
            "container": self.container,
            "style": self.style_url(),
            "center": <[f64; 2]>::from(self.center),
            "zoom": self.zoom,
            "preserveDrawingBuffer": true,
        })
    }

    /// Scroll settings for page navigation.
    pub fn nav_scroll(&self) -> NavScroll {
        NavScroll::new(self.nav_offset, self.scroll_duration_ms)
    }

    /// Looks up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Popup template of the layer a clicked feature belongs to.
    pub fn popup_for_layer(&self, id: &str) -> Option<&PopupTemplate> {
        self.layer(id).and_then(|layer| layer.popup.as_ref())
    }

    /// Layers that react to clicks.
    pub fn interactive_layers(&self) -> impl Iterator<Item = &LayerConfig> {
        self.layers.iter().filter(|layer| layer.popup.is_some())
    }

    /// Fails with every validation problem at once.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// Collects every problem in the configuration.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            issues.push(ValidationIssue::ZoomOutOfRange(self.zoom));
        }
        if !(-180.0..=180.0).contains(&self.center.lng) || !(-90.0..=90.0).contains(&self.center.lat)
        {
            issues.push(ValidationIssue::CenterOutOfRange {
                lng: self.center.lng,
                lat: self.center.lat,
            });
        }

        let mut source_names = HashSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                issues.push(ValidationIssue::EmptySourceName { index });
            } else if !source_names.insert(source.name.as_str()) {
                issues.push(ValidationIssue::DuplicateSource(source.name.clone()));
            }
        }

        let mut layer_ids = HashSet::new();
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.id.trim().is_empty() {
                issues.push(ValidationIssue::EmptyLayerId { index });
            } else if !layer_ids.insert(layer.id.as_str()) {
                issues.push(ValidationIssue::DuplicateLayer(layer.id.clone()));
            }
            if !source_names.contains(layer.source.as_str()) {
                issues.push(ValidationIssue::UnknownSource {
                    layer: layer.id.clone(),
                    source_name: layer.source.clone(),
                });
            }
            if let Some(popup) = &layer.popup {
                validate_popup(&layer.id, popup, &mut issues);
            }
        }

        if !issues.is_empty() {
            tracing::debug!(count = issues.len(), "map config failed validation");
        }
        issues
    }
}

fn validate_popup(layer: &str, popup: &PopupTemplate, issues: &mut Vec<ValidationIssue>) {
    let raw_fields = std::iter::once(popup.title.as_str())
        .chain(popup.subtitle.as_deref())
        .chain(popup.properties.as_deref());
    for field in raw_fields {
        if field.contains(FORBIDDEN_POPUP_SEQUENCE) {
            issues.push(ValidationIssue::ForbiddenPopupSequence {
                layer: layer.to_string(),
                field: field.to_string(),
            });
        }
    }

    for field in popup.fields() {
        let count = placeholder_names(field).len();
        if count > 1 {
            issues.push(ValidationIssue::MultiplePlaceholders {
                layer: layer.to_string(),
                field: field.to_string(),
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "access_token": "pk.test",
        "style": "light",
        "center": [-84.51, 39.10],
        "zoom": 11,
        "sources": [
            { "name": "parks", "data": { "type": "geojson", "file": "/static/data/1/parks.geojson" } }
        ],
        "layers": [
            {
                "id": "parks-fill",
                "type": "fill",
                "source": "parks",
                "paint": { "fill-color": "#2a9d8f" },
                "popup": {
                    "title": "{NAME}",
                    "subtitle": "Ward {WARD}",
                    "properties": "Area: {ACRES} acres;Open daily"
                }
            },
            { "id": "parks-outline", "type": "line", "source": "parks", "source-layer": "outlines" }
        ]
    }"##;

    #[test]
    fn parses_sample_with_defaults() {
        let config = MapConfig::load(SAMPLE).expect("load sample");
        assert_eq!(config.container, "map");
        assert_eq!(config.center, LngLat { lng: -84.51, lat: 39.10 });
        assert_eq!(config.missing_property, MissingPropertyPolicy::Blank);
        assert_eq!(config.nav_offset, DEFAULT_NAV_OFFSET);
        assert_eq!(config.layers[1].layout, json!({}));
        assert_eq!(config.layers[1].source_layer.as_deref(), Some("outlines"));
    }

    #[test]
    fn stock_styles_expand_and_urls_pass_through() {
        let mut config = MapConfig::default();
        assert_eq!(config.style_url(), "mapbox://styles/mapbox/basic-v9");
        config.style = "mapbox://styles/acme/custom".to_string();
        assert_eq!(config.style_url(), "mapbox://styles/acme/custom");
    }

    #[test]
    fn descriptors_match_mapbox_shapes() {
        let config = MapConfig::load(SAMPLE).expect("load sample");
        assert_eq!(
            config.sources[0].descriptor(),
            json!({ "type": "geojson", "data": "/static/data/1/parks.geojson" })
        );
        let outline = config.layers[1].descriptor();
        assert_eq!(outline["source-layer"], "outlines");
        assert_eq!(outline["paint"], json!({}));
        assert!(config.layers[0].descriptor().get("source-layer").is_none());

        let options = config.map_options();
        assert_eq!(options["style"], "mapbox://styles/mapbox/light-v9");
        assert_eq!(options["center"], json!([-84.51, 39.10]));
        assert_eq!(options["preserveDrawingBuffer"], true);
    }

    #[test]
    fn resolves_popup_by_layer_id() {
        let config = MapConfig::load(SAMPLE).expect("load sample");
        assert_eq!(
            config.popup_for_layer("parks-fill").map(|popup| popup.title.as_str()),
            Some("{NAME}")
        );
        assert!(config.popup_for_layer("parks-outline").is_none());
        assert!(config.popup_for_layer("nope").is_none());
        assert_eq!(config.interactive_layers().count(), 1);
    }

    #[test]
    fn collects_every_issue() {
        let mut config = MapConfig::load(SAMPLE).expect("load sample");
        config.zoom = 30.0;
        config.center = LngLat { lng: 200.0, lat: 0.0 };
        config.sources.push(config.sources[0].clone());
        let mut dangling = config.layers[1].clone();
        dangling.source = "roads".to_string();
        config.layers.push(dangling);

        let issues = config.validate();
        assert!(issues.contains(&ValidationIssue::ZoomOutOfRange(30.0)));
        assert!(issues.contains(&ValidationIssue::CenterOutOfRange { lng: 200.0, lat: 0.0 }));
        assert!(issues.contains(&ValidationIssue::DuplicateSource("parks".to_string())));
        assert!(issues.contains(&ValidationIssue::DuplicateLayer("parks-outline".to_string())));
        assert!(issues.contains(&ValidationIssue::UnknownSource {
            layer: "parks-outline".to_string(),
            source_name: "roads".to_string(),
        }));

        let err = config.ensure_valid().expect_err("invalid config");
        assert!(err.to_string().starts_with("map config has 5 problem(s)"));
    }

    #[test]
    fn flags_suspicious_popups() {
        let mut config = MapConfig::load(SAMPLE).expect("load sample");
        if let Some(popup) = config.layers[0].popup.as_mut() {
            popup.title = "{NAME} ({WARD})".to_string();
            popup.properties = Some("a{};b".to_string());
        }

        let issues = config.validate();
        assert_eq!(issues.len(), 2, "{issues:?}");
        assert!(matches!(
            &issues[0],
            ValidationIssue::ForbiddenPopupSequence { layer, .. } if layer == "parks-fill"
        ));
        assert!(matches!(
            &issues[1],
            ValidationIssue::MultiplePlaceholders { count: 2, .. }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = MapConfig::from_json_str("{ \"layers\": 3 }").expect_err("bad layers");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
