use cbmap_shared::{nav::section_id, NavScroll};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Element, Event};
use yew::prelude::*;

use crate::utils::{scroll_page_to, section_top};

const NAV_LINK_SELECTOR: &str = ".nav-item a, a[href='#top']";

/// Smooth-scrolls nav links (`.nav-item a`) to their section, leaving room
/// for the fixed navbar, and `#top` links back to the top of the page.
///
/// One delegated listener on the document handles every link, so links
/// rendered after mount are covered too.
#[hook]
pub fn use_nav_scroll(nav: NavScroll) {
    use_effect_with(nav, move |nav| {
        let nav = *nav;
        let document = window().and_then(|win| win.document());

        let listener = Closure::wrap(Box::new(move |event: Event| {
            let Some(link) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(NAV_LINK_SELECTOR).ok().flatten())
            else {
                return;
            };
            let Some(href) = link.get_attribute("href") else {
                return;
            };

            let target = if href == "#top" {
                Some(nav.to_top())
            } else {
                section_id(&href)
                    .and_then(section_top)
                    .map(|top| nav.target_for(top))
            };

            if let Some(top) = target {
                event.prevent_default();
                scroll_page_to(top, nav.duration_ms());
            }
        }) as Box<dyn FnMut(Event)>);

        if let Some(document) = &document {
            if let Err(err) =
                document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            {
                web_sys::console::error_1(&err);
            }
        }

        move || {
            if let Some(document) = document {
                let _ = document
                    .remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
            }
            drop(listener);
        }
    });
}
