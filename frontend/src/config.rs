//! Page bootstrap: the map configuration is embedded by the server as a
//! JSON script element and read once at startup.

use cbmap_shared::MapConfig;
use web_sys::window;

/// Id of the `<script type="application/json">` element holding the config.
pub const CONFIG_ELEMENT_ID: &str = "map-config";

/// Reads and validates the page's map configuration.
pub fn read_page_config() -> Result<MapConfig, String> {
    let element = window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .ok_or_else(|| format!("missing #{CONFIG_ELEMENT_ID} element"))?;
    let raw = element.text_content().unwrap_or_default();
    MapConfig::load(&raw).map_err(|err| err.to_string())
}
