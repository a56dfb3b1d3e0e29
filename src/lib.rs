//! Pokemon catalog TUI built on tui-dispatch
//!
//! Exposes the modules for the binary and the integration tests.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod loader;
pub mod reducer;
pub mod route;
pub mod sprite;
pub mod sprite_backend;
pub mod state;
