use cbmap_shared::NavScroll;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;
use yew::prelude::*;

use crate::utils::scroll_page_to;

const SHOW_AFTER_PX: f64 = 400.0;

#[derive(Properties, PartialEq)]
pub struct ScrollToTopButtonProps {
    #[prop_or_default]
    pub nav: NavScroll,
}

#[function_component(ScrollToTopButton)]
pub fn scroll_to_top_button(props: &ScrollToTopButtonProps) -> Html {
    let show = use_state(|| false);

    // Track scrolling to toggle visibility
    {
        let show = show.clone();
        use_effect_with((), move |_| {
            let window = window();

            let closure = {
                let show = show.clone();
                let window = window.clone();
                Closure::wrap(Box::new(move || {
                    let scroll_y = window
                        .as_ref()
                        .and_then(|win| win.scroll_y().ok())
                        .unwrap_or(0.0);
                    show.set(scroll_y > SHOW_AFTER_PX);
                }) as Box<dyn Fn()>)
            };

            if let Some(window) = &window {
                if let Err(err) = window
                    .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
                {
                    web_sys::console::error_1(&err);
                }
            }

            move || {
                if let Some(window) = window {
                    let _ = window.remove_event_listener_with_callback(
                        "scroll",
                        closure.as_ref().unchecked_ref(),
                    );
                }
                drop(closure);
            }
        });
    }

    let onclick = {
        let nav = props.nav;
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            scroll_page_to(nav.to_top(), nav.duration_ms());
        })
    };

    if *show {
        html! {
            <button
                class="scroll-to-top"
                onclick={onclick}
                aria-label="Back to top"
                title="Back to top"
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    width="24"
                    height="24"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    <polyline points="18 15 12 9 6 15"></polyline>
                </svg>
            </button>
        }
    } else {
        html! {}
    }
}
