mod editor;
mod options;
mod status;

pub use editor::{DualModeEditor, EditMode, FormEntry, SaveOutcome, enter_form, enter_text};
pub use options::{DEFAULT_SETTINGS_KEY, EditorOptions};
pub use status::StatusLine;
