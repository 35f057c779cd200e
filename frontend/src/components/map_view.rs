use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use cbmap_shared::{LayerConfig, MapConfig, MissingPropertyPolicy, PopupTemplate};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::console;
use yew::prelude::*;

use crate::mapbox::{self, MapboxMap, Popup};

type Listener = Closure<dyn FnMut(JsValue)>;
type Listeners = Rc<RefCell<Vec<Listener>>>;

#[derive(Properties, PartialEq)]
pub struct MapViewProps {
    pub config: Rc<MapConfig>,
}

/// Mounts a Mapbox map for `config` and keeps its event handlers alive
/// until the component unmounts.
#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    use_effect_with(props.config.clone(), move |config| {
        let mounted = mount_map(config.clone());
        move || {
            if let Some((map, listeners)) = mounted {
                map.remove();
                listeners.borrow_mut().clear();
            }
        }
    });

    html! {
        <div id={props.config.container.clone()} class="map" />
    }
}

fn mount_map(config: Rc<MapConfig>) -> Option<(MapboxMap, Listeners)> {
    if let Err(err) = mapbox::set_access_token(&config.access_token) {
        console::error_1(&err);
        return None;
    }

    let map = match mapbox::to_js(&config.map_options()).and_then(|options| MapboxMap::new(&options))
    {
        Ok(map) => map,
        Err(err) => {
            console::error_1(&err);
            return None;
        },
    };

    let listeners: Listeners = Rc::default();
    let on_load = {
        let map = map.clone();
        let listeners = Rc::downgrade(&listeners);
        Closure::wrap(Box::new(move |_event: JsValue| {
            add_sources(&map, &config);
            let handlers = add_layers(&map, &config);
            if let Some(listeners) = Weak::upgrade(&listeners) {
                listeners.borrow_mut().extend(handlers);
            }
        }) as Box<dyn FnMut(JsValue)>)
    };
    map.on("load", on_load.as_ref().unchecked_ref());
    listeners.borrow_mut().push(on_load);

    Some((map, listeners))
}

fn add_sources(map: &MapboxMap, config: &MapConfig) {
    for source in &config.sources {
        if !map.get_source(&source.name).is_undefined() {
            map.remove_source(&source.name);
        }
        match mapbox::to_js(&source.descriptor()) {
            Ok(descriptor) => map.add_source(&source.name, &descriptor),
            Err(err) => console::error_1(&err),
        }
    }
}

fn add_layers(map: &MapboxMap, config: &MapConfig) -> Vec<Listener> {
    let mut handlers = Vec::new();
    for layer in &config.layers {
        if !map.get_layer(&layer.id).is_undefined() {
            map.remove_layer(&layer.id);
        }
        match mapbox::to_js(&layer.descriptor()) {
            Ok(descriptor) => map.add_layer(&descriptor),
            Err(err) => {
                console::error_1(&err);
                continue;
            },
        }
        if let Some(popup) = &layer.popup {
            handlers.extend(bind_popup(map, layer, popup, config.missing_property));
        }
    }
    handlers
}

// Each handler owns its own copy of the layer id and template.
fn bind_popup(
    map: &MapboxMap,
    layer: &LayerConfig,
    popup: &PopupTemplate,
    policy: MissingPropertyPolicy,
) -> [Listener; 3] {
    let click = popup_handler(map.clone(), layer.id.clone(), popup.clone(), policy);
    let enter = cursor_handler(map.clone(), "pointer");
    let leave = cursor_handler(map.clone(), "");

    map.on_layer("click", &layer.id, click.as_ref().unchecked_ref());
    map.on_layer("mouseenter", &layer.id, enter.as_ref().unchecked_ref());
    map.on_layer("mouseleave", &layer.id, leave.as_ref().unchecked_ref());

    [click, enter, leave]
}

fn popup_handler(
    map: MapboxMap,
    layer_id: String,
    template: PopupTemplate,
    policy: MissingPropertyPolicy,
) -> Listener {
    Closure::wrap(Box::new(move |event: JsValue| {
        let Some((properties, lng_lat)) = mapbox::clicked_feature(&event, &layer_id) else {
            return;
        };
        let missing = template.missing_properties(&properties);
        if policy == MissingPropertyPolicy::Blank && !missing.is_empty() {
            console::warn_1(
                &format!(
                    "Popup for layer `{layer_id}` references missing properties: {}",
                    missing.join(", ")
                )
                .into(),
            );
        }
        match template.render(&properties, policy) {
            Ok(content) => {
                Popup::new()
                    .set_lng_lat(&lng_lat)
                    .set_html(&content.to_html())
                    .add_to(&map);
            },
            Err(err) => {
                console::warn_1(&format!("Popup for layer `{layer_id}` skipped: {err}").into());
            },
        }
    }) as Box<dyn FnMut(JsValue)>)
}

fn cursor_handler(map: MapboxMap, cursor: &'static str) -> Listener {
    Closure::wrap(Box::new(move |_event: JsValue| {
        let _ = map.get_canvas().style().set_property("cursor", cursor);
    }) as Box<dyn FnMut(JsValue)>)
}
