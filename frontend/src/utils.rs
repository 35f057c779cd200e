use web_sys::{window, ScrollBehavior, ScrollToOptions};

/// Scrolls the window to `top`; a zero duration jumps instead of animating.
pub fn scroll_page_to(top: f64, duration_ms: u32) {
    let Some(window) = window() else {
        return;
    };

    let options = ScrollToOptions::new();
    options.set_behavior(if duration_ms == 0 {
        ScrollBehavior::Instant
    } else {
        ScrollBehavior::Smooth
    });
    options.set_top(top);
    options.set_left(window.scroll_x().unwrap_or(0.0));

    window.scroll_with_scroll_to_options(&options);
}

/// Document-relative top of the element with `id`.
pub fn section_top(id: &str) -> Option<f64> {
    let window = window()?;
    let element = window.document()?.get_element_by_id(id)?;
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    Some(element.get_bounding_client_rect().top() + scroll_y)
}
