pub const DEFAULT_SETTINGS_KEY: &str = "customFields";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Key of the field set inside the settings document.
    pub settings_key: String,
    /// Pretty print the text view.
    pub pretty: bool,
    /// Report duplicate keys as warnings.
    pub flag_duplicates: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
            pretty: true,
            flag_duplicates: true,
        }
    }
}

impl EditorOptions {
    pub fn with_settings_key(mut self, key: impl Into<String>) -> Self {
        self.settings_key = key.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_duplicate_warnings(mut self, enabled: bool) -> Self {
        self.flag_duplicates = enabled;
        self
    }
}
