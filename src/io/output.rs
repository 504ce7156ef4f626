use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Where a saved settings document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

impl fmt::Display for OutputDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputDestination::Stdout => f.write_str("stdout"),
            OutputDestination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Controls how a document is serialized before it is written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Render a settings document once and write it to every destination.
pub fn emit(document: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = render_document(document, options.format, options.pretty)
        .with_context(|| format!("failed to serialize settings as {}", options.format))?;
    for destination in &options.destinations {
        write_payload(destination, &payload)
            .with_context(|| format!("failed to write settings to {destination}"))?;
    }
    Ok(())
}

fn render_document(document: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(document)?,
        DocumentFormat::Json => serde_json::to_string(document)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(document)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(document)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(document)?,
    };
    // YAML and TOML end with a newline of their own.
    Ok(rendered.trim_end_matches('\n').to_string())
}

fn write_payload(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{payload}")?;
            stdout.flush()?;
        }
        OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emit_is_noop_without_destinations() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"customFields": {"a": 1}}), &options).unwrap();
    }

    #[test]
    fn writes_settings_to_file_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let options = OutputOptions::default()
            .with_pretty(false)
            .with_destinations(vec![OutputDestination::file(&path)]);
        emit(&json!({"customFields": {"a": 1}}), &options).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"customFields\":{\"a\":1}}\n");
    }

    #[test]
    fn write_failures_name_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("settings.json");
        let options =
            OutputOptions::default().with_destinations(vec![OutputDestination::file(&path)]);
        let err = emit(&json!({"customFields": {}}), &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("failed to write settings to {}", path.display())
        );
    }

    #[test]
    fn destinations_display_their_target() {
        assert_eq!(OutputDestination::Stdout.to_string(), "stdout");
        assert_eq!(OutputDestination::file("out.json").to_string(), "out.json");
    }
}
