//! Target-independent pieces of the map viewer: popup templating, map
//! configuration and navigation scroll maths. Used by both the wasm
//! frontend and the native CLI.

pub mod config;
pub mod nav;
pub mod popup;
pub mod template;

pub use config::{
    ConfigError, LayerConfig, LngLat, MapConfig, SourceConfig, SourceData, ValidationIssue,
};
pub use nav::NavScroll;
pub use popup::{PopupContent, PopupTemplate};
pub use template::{
    interpolate, interpolate_with, MissingPropertyPolicy, PropertyBag, TemplateError,
};

/// Extracts the property bag from a GeoJSON `Feature`, or returns the
/// object itself when it is already a bare properties map.
pub fn feature_properties(
    value: &serde_json::Value,
) -> Option<&serde_json::Map<String, serde_json::Value>> {
    let object = value.as_object()?;
    let is_feature = object.get("type").and_then(|kind| kind.as_str()) == Some("Feature");
    if is_feature {
        object.get("properties").and_then(|properties| properties.as_object())
    } else {
        Some(object)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_feature_or_bare_properties() {
        let feature = json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0, 0] },
            "properties": { "NAME": "Pier" }
        });
        assert_eq!(
            feature_properties(&feature)
                .and_then(|p| p.lookup("NAME"))
                .as_deref(),
            Some("Pier")
        );

        let bare = json!({ "NAME": "Dock" });
        assert_eq!(
            feature_properties(&bare)
                .and_then(|p| p.lookup("NAME"))
                .as_deref(),
            Some("Dock")
        );

        assert!(feature_properties(&json!({ "type": "Feature", "properties": null })).is_none());
        assert!(feature_properties(&json!([1, 2])).is_none());
    }
}
