use fieldforge::prelude::*;
use fieldforge::{SHAPE_ERROR, apply_saved, serialized_to_fields};
use serde_json::{Value, json};

fn set(value: Value) -> SerializedFieldSet {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn open(value: Value) -> DualModeEditor {
    DualModeEditor::open(Some(&set(value)), EditorOptions::default())
}

#[test]
fn add_text_field_then_remove_it_in_form() {
    let mut editor = open(json!({"a": 1, "b": true}));
    let kinds: Vec<_> = editor.fields().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FieldType::Number, FieldType::Boolean]);

    editor.switch_to_text();
    assert_eq!(editor.mode(), EditMode::Text);
    let shown: Value = serde_json::from_str(editor.text()).unwrap();
    assert_eq!(shown, json!({"a": 1, "b": true}));

    editor.set_text(r#"{"a": 1, "b": true, "c": "x"}"#);
    editor.switch_to_form();
    assert_eq!(editor.fields().len(), 3);
    assert!(editor.issues().is_empty());

    let c = editor.find_row("c").unwrap();
    editor.remove_row(c);
    let saved = editor.save();
    assert_eq!(saved.fields, Some(set(json!({"a": 1, "b": true}))));
    assert!(saved.warnings.is_empty());
}

#[test]
fn invalid_text_falls_back_to_last_valid_rows() {
    let mut editor = open(json!({"a": 1, "b": true}));
    let before = editor.fields().to_vec();

    editor.switch_to_text();
    editor.set_text(r#"{"a": }"#);
    editor.switch_to_form();

    assert_eq!(editor.mode(), EditMode::Form);
    assert_eq!(editor.fields(), before.as_slice());
    let issues = editor.issues();
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], ConversionIssue::Syntax { .. }));

    let saved = editor.save();
    assert_eq!(saved.fields, Some(set(json!({"a": 1, "b": true}))));
}

#[test]
fn save_ignores_unfinished_text_even_in_text_mode() {
    let mut editor = open(json!({"a": 1}));
    editor.switch_to_text();
    editor.set_text(r#"{"a": 2, "b": "#);
    assert_eq!(editor.mode(), EditMode::Text);
    assert_eq!(editor.save().fields, Some(set(json!({"a": 1}))));
}

#[test]
fn clean_text_edits_are_saved_without_switching_back() {
    let mut editor = open(json!({"a": 1}));
    editor.switch_to_text();
    editor.set_text(r#"{"a": 2}"#);
    assert_eq!(editor.save().fields, Some(set(json!({"a": 2}))));
}

#[test]
fn array_text_reports_shape_error() {
    let parsed = serialized_to_fields("[1,2,3]");
    assert!(parsed.fields.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].to_string(), SHAPE_ERROR);
}

#[test]
fn emptied_editor_saves_absent_value() {
    let mut editor = open(json!({"a": 1}));
    editor.switch_to_text();
    editor.set_text("");
    editor.switch_to_form();
    assert!(editor.fields().is_empty());
    let saved = editor.save();
    assert_eq!(saved.fields, None);

    let options = EditorOptions::default();
    let mut settings = json!({"endpoint": "https://api", "customFields": {"a": 1}});
    apply_saved(&mut settings, &saved, &options).unwrap();
    assert_eq!(settings, json!({"endpoint": "https://api"}));
}

#[test]
fn repeated_mode_switches_do_not_drift() {
    let mut editor = open(json!({
        "temperature": 0.7,
        "stream": false,
        "stop": ["\n\n", "END"],
        "meta": {"user": "u-1", "tags": null},
        "note": "  spaced  "
    }));
    let original = editor.save().fields;
    for _ in 0..5 {
        editor.switch_to_text();
        editor.switch_to_form();
    }
    assert!(editor.issues().is_empty());
    assert_eq!(editor.save().fields, original);
}

#[test]
fn form_edits_are_mirrored_before_switching() {
    let mut editor = DualModeEditor::open(None, EditorOptions::default());
    let idx = editor.add_row().unwrap();
    editor.set_row_key(idx, "max_tokens");
    editor.set_row_type(idx, FieldType::Number);
    editor.set_row_value(idx, "256");
    let mirrored: Value = serde_json::from_str(editor.text()).unwrap();
    assert_eq!(mirrored, json!({"max_tokens": 256}));

    editor.switch_to_text();
    let shown: Value = serde_json::from_str(editor.text()).unwrap();
    assert_eq!(shown, mirrored);
}

#[test]
fn settings_round_trip_through_editor() {
    let options = EditorOptions::default();
    let mut settings = json!({"endpoint": "https://api", "customFields": {"a": 1}});
    let mut editor = FieldSettings::from_document(&settings, &options)
        .unwrap()
        .open_editor(options.clone());
    let idx = editor.add_row().unwrap();
    editor.update_row(idx, CustomField::new("seed", FieldType::Number, "7"));
    let saved = editor.save();
    apply_saved(&mut settings, &saved, &options).unwrap();
    assert_eq!(
        settings,
        json!({"endpoint": "https://api", "customFields": {"a": 1, "seed": 7}})
    );
}
