use super::editor::EditMode;

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Toggle the mode to edit as JSON.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode_changed(&mut self, mode: EditMode) {
        self.message = match mode {
            EditMode::Form => "Editing as form".to_string(),
            EditMode::Text => "Editing as JSON".to_string(),
        };
    }

    pub fn value_updated(&mut self) {
        self.message = "Value updated".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn saved(&mut self, count: usize) {
        self.message = if count == 0 {
            "Saved: no custom fields".to_string()
        } else {
            format!("Saved {count} custom field(s)")
        };
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
