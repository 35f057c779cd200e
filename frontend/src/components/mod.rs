// Reusable components live here.

pub mod error_banner;
pub mod map_view;
pub mod scroll_to_top_button;
