mod handlers;
mod main_menu;
mod progress_view;

pub use main_menu::show_main_menu;
pub use progress_view::ExtractionView;
