//! Mermaid Studio library target.
//!
//! Exposes the application modules for integration tests. The binary entry
//! point is in `main.rs`.

pub mod app;
pub mod dialogs;
pub mod helpers;
pub mod highlight;
pub mod keyboard;
pub mod messages;
pub mod palette;
pub mod preview;
pub mod update;
pub mod view_ui;
