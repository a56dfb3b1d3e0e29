pub mod app_shell;
pub mod detail_screen;
pub mod format;
pub mod image_pane;
pub mod listing_screen;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use app_shell::{AppShell, AppShellProps, ShellLayout};
pub use detail_screen::{DetailScreen, DetailScreenProps, NOT_FOUND_TEXT};
pub use image_pane::{ImagePane, ImagePaneProps};
pub use listing_screen::{handle_search_key, ListingScreen, ListingScreenProps};
