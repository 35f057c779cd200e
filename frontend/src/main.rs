mod components;
mod config;
mod hooks;
mod mapbox;
mod utils;

use std::rc::Rc;

use cbmap_shared::{MapConfig, NavScroll};
use yew::prelude::*;

use crate::{
    components::{
        error_banner::ErrorBanner, map_view::MapView, scroll_to_top_button::ScrollToTopButton,
    },
    hooks::use_nav_scroll,
};

#[function_component(App)]
fn app() -> Html {
    let loaded = use_memo((), |_| config::read_page_config().map(Rc::new));
    let nav = match &*loaded {
        Ok(config) => config.nav_scroll(),
        Err(_) => NavScroll::default(),
    };
    use_nav_scroll(nav);

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if let Err(message) = &*loaded {
                web_sys::console::error_1(&format!("Failed to load map config: {}", message).into());
            }
        });
    }

    match &*loaded {
        Ok(config) => html! {
            <>
                <MapView config={Rc::<MapConfig>::clone(config)} />
                <ScrollToTopButton nav={nav} />
            </>
        },
        Err(message) => html! {
            <>
                <ErrorBanner message={message.clone()} />
                <ScrollToTopButton nav={nav} />
            </>
        },
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
