//! Native dialogs. Every function here is async so it can run inside a
//! `Task::perform` without blocking the event loop.

use crate::messages::SaveChoice;

use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};

const DIAGRAM_EXTENSIONS: &[&str] = &["mmd", "mermaid"];

fn diagram_dialog(title: &str, start_dir: Option<&Path>) -> AsyncFileDialog {
    let dialog = AsyncFileDialog::new()
        .set_title(title)
        .add_filter("Mermaid diagram", DIAGRAM_EXTENSIONS)
        .add_filter("All files", &["*"]);
    match start_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

pub async fn pick_open_path(start_dir: Option<PathBuf>) -> Option<PathBuf> {
    diagram_dialog("Open Diagram", start_dir.as_deref())
        .pick_file()
        .await
        .map(|h| h.path().to_path_buf())
}

pub async fn pick_save_path(file_name: String, start_dir: Option<PathBuf>) -> Option<PathBuf> {
    diagram_dialog("Save Diagram", start_dir.as_deref())
        .set_file_name(file_name)
        .save_file()
        .await
        .map(|h| h.path().to_path_buf())
}

pub async fn pick_export_path(file_name: String, start_dir: Option<PathBuf>) -> Option<PathBuf> {
    let dialog = AsyncFileDialog::new()
        .set_title("Export PNG")
        .add_filter("PNG image", &["png"])
        .set_file_name(file_name);
    let dialog = match start_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    };
    dialog.save_file().await.map(|h| h.path().to_path_buf())
}

pub async fn pick_renderer() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Locate mmdc")
        .pick_file()
        .await
        .map(|h| h.path().to_path_buf())
}

/// Ask what to do with unsaved changes. Closing the dialog counts as Cancel.
pub async fn confirm_discard(name: String) -> SaveChoice {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Unsaved changes")
        .set_description(format!(
            "Save changes to {} before continuing?\n\nYes saves, No discards the changes.",
            name
        ))
        .set_buttons(MessageButtons::YesNoCancel)
        .show()
        .await;
    save_choice(result)
}

pub fn save_choice(result: MessageDialogResult) -> SaveChoice {
    match result {
        MessageDialogResult::Yes | MessageDialogResult::Ok => SaveChoice::Save,
        MessageDialogResult::No => SaveChoice::Discard,
        _ => SaveChoice::Cancel,
    }
}
