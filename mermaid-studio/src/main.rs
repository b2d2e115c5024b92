use mermaid_studio::app::boot;
use mermaid_studio::keyboard::subscription;
use mermaid_studio::update::update;
use mermaid_studio::view_ui::{theme, title, view};

use iced::{Settings, Size, window};

pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Mermaid Studio starting");

    let settings = Settings {
        antialiasing: true,
        ..Settings::default()
    };

    // Close requests are handled in `update` so unsaved work can be saved
    // and the renderer stopped before the window goes away.
    let window = window::Settings {
        size: Size::new(1280.0, 800.0),
        exit_on_close_request: false,
        ..window::Settings::default()
    };

    iced::application(boot, update, view)
        .title(title)
        .theme(theme)
        .subscription(subscription)
        .settings(settings)
        .window(window)
        .run()
}
