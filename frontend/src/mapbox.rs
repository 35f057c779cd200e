// Thin bindings over the global `mapboxgl` object loaded by the page.

use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_namespace = mapboxgl)]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    #[derive(Clone, Debug)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_class = "Map", catch)]
    pub fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &MapboxMap, event: &str, layer_id: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addSource)]
    pub fn add_source(this: &MapboxMap, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = removeSource)]
    pub fn remove_source(this: &MapboxMap, id: &str);

    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &MapboxMap, id: &str);

    #[wasm_bindgen(method, js_name = getCanvas)]
    pub fn get_canvas(this: &MapboxMap) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    pub fn remove(this: &MapboxMap);
}

#[wasm_bindgen(js_namespace = mapboxgl)]
extern "C" {
    pub type Popup;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Popup, map: &MapboxMap) -> Popup;
}

/// Sets `mapboxgl.accessToken`. Must run before the first map is built.
pub fn set_access_token(token: &str) -> Result<(), JsValue> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if mapboxgl.is_undefined() {
        return Err(JsValue::from_str("mapboxgl is not loaded"));
    }
    js_sys::Reflect::set(&mapboxgl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}

/// Converts a JSON descriptor into a plain JS object.
pub fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

/// Reads a JS object back as JSON.
pub fn from_js(value: &JsValue) -> Option<Value> {
    let text: String = js_sys::JSON::stringify(value).ok()?.into();
    serde_json::from_str(&text).ok()
}

/// Properties of the first clicked feature drawn by `layer_id`, plus the
/// event's `lngLat`.
pub fn clicked_feature(
    event: &JsValue,
    layer_id: &str,
) -> Option<(serde_json::Map<String, Value>, JsValue)> {
    let features: js_sys::Array =
        js_sys::Reflect::get(event, &JsValue::from_str("features")).ok()?.dyn_into().ok()?;
    let feature = features.iter().find(|feature| {
        js_sys::Reflect::get(feature, &JsValue::from_str("layer"))
            .and_then(|layer| js_sys::Reflect::get(&layer, &JsValue::from_str("id")))
            .ok()
            .and_then(|id| id.as_string())
            .is_some_and(|id| id == layer_id)
    })?;

    let properties = js_sys::Reflect::get(&feature, &JsValue::from_str("properties")).ok()?;
    let properties = match from_js(&properties) {
        Some(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    let lng_lat = js_sys::Reflect::get(event, &JsValue::from_str("lngLat")).ok()?;
    Some((properties, lng_lat))
}
