//! Command line front end for `fieldforge`: inspect field sets, check raw
//! text, and edit the custom fields stored in a settings document.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fieldforge::{
    ConversionIssue, DocumentFormat, DualModeEditor, EditorOptions, FieldSettings, FieldType,
    OutputDestination, OutputOptions, apply_saved, emit, field_set_from_value,
    parse_document_any, serialized_to_fields, validate,
};

const LOG_ENV: &str = "FIELDFORGE_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "fieldforge",
    version,
    about = "Edit typed custom request fields as rows or as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the form rows (key, type, value) of a field set
    Inspect(SourceArgs),
    /// Print the text view of a field set
    ToText {
        #[command(flatten)]
        source: SourceArgs,
        /// Emit compact JSON rather than pretty formatting
        #[arg(long = "no-pretty")]
        no_pretty: bool,
    },
    /// Check raw text the way the text editor does
    Check {
        /// Text spec: file path, inline payload, or "-" for stdin
        #[arg(value_name = "SPEC")]
        spec: String,
    },
    /// Apply edits to the custom fields of a settings document and save it
    Edit(EditArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Field set spec: file path, inline payload, or "-" for stdin
    #[arg(value_name = "SPEC")]
    spec: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    /// Settings spec: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "settings", value_name = "SPEC")]
    settings: String,

    /// Key holding the custom fields inside the settings document
    #[arg(
        long = "settings-key",
        value_name = "KEY",
        default_value = fieldforge::DEFAULT_SETTINGS_KEY
    )]
    settings_key: String,

    /// Replace the whole field set with this JSON text before other edits
    #[arg(long = "text", value_name = "JSON")]
    text: Option<String>,

    /// Remove every row with this key
    #[arg(long = "remove", value_name = "KEY", action = ArgAction::Append)]
    remove: Vec<String>,

    /// Set a row: KEY=VALUE or KEY:TYPE=VALUE (TYPE is string, number, boolean or json)
    #[arg(long = "set", value_name = "ASSIGNMENT", action = ArgAction::Append)]
    set: Vec<String>,

    /// Output destinations ("-" writes to stdout); defaults to the settings file itself
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DEST",
        num_args = 1..,
        action = ArgAction::Append
    )]
    outputs: Vec<String>,

    /// Do not warn about duplicate keys
    #[arg(long = "allow-duplicates")]
    allow_duplicates: bool,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(source) => inspect(&source),
        Command::ToText { source, no_pretty } => to_text(&source, !no_pretty),
        Command::Check { spec } => check(&spec),
        Command::Edit(args) => edit(&args),
    }
}

fn init_tracing() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn inspect(source: &SourceArgs) -> Result<()> {
    let editor = open_field_set(&source.spec, EditorOptions::default())?;
    if editor.fields().is_empty() {
        println!("no custom fields");
    }
    for field in editor.fields() {
        let value = field.value.replace('\n', " ");
        println!("{}\t{}\t{}", field.key, field.kind, value);
    }
    report_issues(&editor.issues());
    Ok(())
}

fn to_text(source: &SourceArgs, pretty: bool) -> Result<()> {
    let mut editor = open_field_set(&source.spec, EditorOptions::default().with_pretty(pretty))?;
    editor.switch_to_text();
    println!("{}", editor.text());
    Ok(())
}

fn check(spec: &str) -> Result<()> {
    let text = load_text(spec, "text")?;
    let verdict = validate(&text);
    let parsed = serialized_to_fields(&text);
    debug!(valid = verdict.valid, rows = parsed.fields.len(), "checked text");
    report_issues(&parsed.errors);
    if parsed.errors.iter().any(ConversionIssue::is_blocking) {
        return Err(eyre!("text cannot be used as custom fields"));
    }
    println!("ok: {} field(s)", parsed.fields.len());
    Ok(())
}

fn edit(args: &EditArgs) -> Result<()> {
    let options = EditorOptions::default()
        .with_settings_key(args.settings_key.clone())
        .with_pretty(!args.no_pretty)
        .with_duplicate_warnings(!args.allow_duplicates);
    let format = detect_format(&args.settings);
    let mut document = load_value(&args.settings, format, "settings")?;
    let settings = FieldSettings::from_document(&document, &options).map_err(Report::msg)?;
    let mut editor = settings.open_editor(options.clone());

    // Row edits clear the errors of rejected text, so those are surfaced
    // before any edit runs.
    let mut reported = Vec::new();
    if let Some(text) = args.text.as_deref() {
        editor.switch_to_text();
        editor.set_text(text);
        editor.switch_to_form();
        reported = editor.issues();
        report_issues(&reported);
    }
    for key in &args.remove {
        while let Some(index) = editor.find_row(key) {
            editor.remove_row(index);
        }
    }
    for raw in &args.set {
        let assignment = Assignment::parse(raw)?;
        assignment.apply(&mut editor);
    }

    let saved = editor.save();
    let remaining: Vec<_> = editor
        .issues()
        .into_iter()
        .filter(|issue| !reported.contains(issue))
        .collect();
    report_issues(&remaining);
    eprintln!("{}", editor.status());
    apply_saved(&mut document, &saved, &options).map_err(Report::msg)?;

    let output = OutputOptions::new(format)
        .with_pretty(!args.no_pretty)
        .with_destinations(output_destinations(args));
    emit(&document, &output).map_err(Report::msg)?;
    Ok(())
}

#[derive(Debug, PartialEq)]
struct Assignment {
    key: String,
    kind: Option<FieldType>,
    value: String,
}

impl Assignment {
    fn parse(raw: &str) -> Result<Self> {
        let (target, value) = raw
            .split_once('=')
            .ok_or_else(|| eyre!("expected KEY=VALUE or KEY:TYPE=VALUE, got '{raw}'"))?;
        let (key, kind) = match target.rsplit_once(':') {
            Some((key, kind)) => match kind.parse::<FieldType>() {
                Ok(kind) => (key, Some(kind)),
                Err(_) => (target, None),
            },
            None => (target, None),
        };
        if key.trim().is_empty() {
            return Err(eyre!("assignment '{raw}' has an empty key"));
        }
        Ok(Self {
            key: key.trim().to_string(),
            kind,
            value: value.to_string(),
        })
    }

    fn apply(&self, editor: &mut DualModeEditor) {
        let index = match editor.find_row(&self.key) {
            Some(index) => index,
            None => match editor.add_row() {
                Some(index) => {
                    editor.set_row_key(index, &self.key);
                    index
                }
                None => return,
            },
        };
        if let Some(kind) = self.kind {
            editor.set_row_type(index, kind);
        }
        editor.set_row_value(index, &self.value);
    }
}

fn open_field_set(spec: &str, options: EditorOptions) -> Result<DualModeEditor> {
    let value = load_value(spec, detect_format(spec), "field set")?;
    let set = field_set_from_value(value).map_err(Report::msg)?;
    Ok(FieldSettings::new(Some(set)).open_editor(options))
}

fn report_issues(issues: &[ConversionIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut body = String::from("warning: invalid data detected\n");
    for (idx, issue) in issues.iter().enumerate() {
        let _ = writeln!(body, "  {}. {}", idx + 1, issue);
    }
    eprint!("{body}");
}

fn output_destinations(args: &EditArgs) -> Vec<OutputDestination> {
    if !args.outputs.is_empty() {
        return args
            .outputs
            .iter()
            .map(|raw| {
                if raw == "-" {
                    OutputDestination::Stdout
                } else {
                    OutputDestination::file(raw)
                }
            })
            .collect();
    }
    let path = Path::new(&args.settings);
    if args.settings != "-" && path.is_file() {
        vec![OutputDestination::file(path)]
    } else {
        vec![OutputDestination::Stdout]
    }
}

fn load_text(spec: &str, label: &str) -> Result<String> {
    if spec == "-" {
        return read_from_source(&InputSource::Stdin);
    }
    // Text that names no existing path is the payload itself.
    let path = Path::new(spec);
    if !path.exists() {
        return Ok(spec.to_string());
    }
    read_from_source(&InputSource::File(path.to_path_buf()))
        .wrap_err_with(|| format!("failed to load {label}"))
}

fn load_value(spec: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    let contents = load_text(spec, label)?;
    parse_document_any(&contents, format)
        .map_err(Report::msg)
        .wrap_err_with(|| format!("failed to parse {label}"))
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn detect_format(spec: &str) -> DocumentFormat {
    let Some(ext) = Path::new(spec).extension() else {
        return DocumentFormat::default();
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    DocumentFormat::available_formats()
        .into_iter()
        .find(|format| match normalized.as_str() {
            "yml" => format.to_string() == "yaml",
            other => format.to_string() == other,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_with_type() {
        let parsed = Assignment::parse("top_k:number=40").unwrap();
        assert_eq!(
            parsed,
            Assignment {
                key: "top_k".to_string(),
                kind: Some(FieldType::Number),
                value: "40".to_string(),
            }
        );
    }

    #[test]
    fn assignment_keeps_colons_that_are_not_types() {
        let parsed = Assignment::parse("ns:model=gpt").unwrap();
        assert_eq!(parsed.key, "ns:model");
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.value, "gpt");
    }

    #[test]
    fn assignment_value_may_contain_equals() {
        let parsed = Assignment::parse("expr:string=a=b").unwrap();
        assert_eq!(parsed.value, "a=b");
    }

    #[test]
    fn assignment_requires_key_and_equals() {
        assert!(Assignment::parse("novalue").is_err());
        assert!(Assignment::parse(" :json=1").is_err());
    }

    #[test]
    fn assignment_updates_existing_rows_in_place() {
        let mut editor = DualModeEditor::open(None, EditorOptions::default());
        Assignment::parse("a:number=1").unwrap().apply(&mut editor);
        Assignment::parse("a=2").unwrap().apply(&mut editor);
        assert_eq!(editor.fields().len(), 1);
        assert_eq!(editor.fields()[0].kind, FieldType::Number);
        assert_eq!(editor.fields()[0].value, "2");
    }

    #[test]
    fn detects_json_by_default() {
        assert_eq!(detect_format("settings.json"), DocumentFormat::Json);
        assert_eq!(detect_format("{\"a\": 1}"), DocumentFormat::Json);
    }
}
