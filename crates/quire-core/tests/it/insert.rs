use crate::helpers::*;
use pretty_assertions::assert_eq;
use quire_core::{AttrValue, AttributeMap, Delta};

#[test]
fn test_text_takes_formats_of_surrounding_run() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    let change = editor.insert_text(2, "!!", &plain()).unwrap();
    assert_eq!(change, Delta::new().retain(2, plain()).insert("!!", plain()));
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("01!!23", bold()).insert("\n", plain())
    );
    assert_eq!(html(&editor), "<p><strong>01!!23</strong></p>");
}

#[test]
fn test_embed_takes_formats_of_surrounding_run() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_embed(2, image(), &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("01", bold())
            .insert_embed(image(), bold())
            .insert("23", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_formats_come_from_the_line_holding_the_index() {
    let mut editor = editor(
        Delta::new()
            .insert("ab\n", plain())
            .insert("cd", italic())
            .insert("\n", plain()),
    );
    editor.insert_text(4, "x\ny", &plain()).unwrap();
    editor.insert_embed(2, image(), &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("ab", plain())
            .insert_embed(image(), plain())
            .insert("\n", plain())
            .insert("cx", italic())
            .insert("\n", plain())
            .insert("yd", italic())
            .insert("\n", plain())
    );
}

#[test]
fn test_on_empty_line() {
    let mut editor = editor(Delta::new().insert("0\n\n3\n", plain()));
    editor.insert_text(2, "!", &plain()).unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("0\n!\n3\n", plain()));
}

#[test]
fn test_end_of_document() {
    let mut editor = editor(Delta::new().insert("Hello\n", plain()));
    editor.insert_text(6, "World!", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("Hello\nWorld!\n", plain())
    );
}

#[test]
fn test_end_of_document_with_newline() {
    let mut editor = editor(Delta::new().insert("Hello\n", plain()));
    editor.insert_text(6, "World!\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("Hello\nWorld!\n", plain())
    );
}

#[test]
fn test_embed_at_end_of_document() {
    let mut editor = editor(Delta::new().insert("Hello\n", plain()));
    editor.insert_embed(6, image(), &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("Hello\n", plain())
            .insert_embed(image(), plain())
            .insert("\n", plain())
    );
}

#[test]
fn test_newline_splitting() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_text(2, "\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("01", bold())
            .insert("\n", plain())
            .insert("23", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_prepend_newline() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_text(0, "\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("\n", plain())
            .insert("0123", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_append_newline() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_text(4, "\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("0123", bold()).insert("\n\n", plain())
    );
}

#[test]
fn test_multiline_text() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_text(2, "\n!!\n!!\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("01", bold())
            .insert("\n", plain())
            .insert("!!", bold())
            .insert("\n", plain())
            .insert("!!", bold())
            .insert("\n", plain())
            .insert("23", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_multiple_newlines() {
    let mut editor = editor(Delta::new().insert("0123", bold()).insert("\n", plain()));
    editor.insert_text(2, "\n\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("01", bold())
            .insert("\n\n", plain())
            .insert("23", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_split_lines_keep_line_formats() {
    let header = AttributeMap::new().with("header", 1);
    let mut editor = editor(Delta::new().insert("0123", plain()).insert("\n", header.clone()));
    editor.insert_text(2, "\n", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("01", plain())
            .insert("\n", header.clone())
            .insert("23", plain())
            .insert("\n", header)
    );
}

#[test]
fn test_text_removing_formats() {
    let strike = AttributeMap::new().with("strike", true);
    let mut editor = editor(Delta::new().insert("01", strike.clone()).insert("\n", plain()));
    let unset = AttributeMap::new()
        .with("bold", false)
        .with("strike", false);
    editor.insert_text(2, "23", &unset).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("01", strike).insert("23\n", plain())
    );
}

#[test]
fn test_explicit_formats_layer_over_inherited() {
    let mut editor = editor(Delta::new().insert("ab", bold()).insert("\n", plain()));
    editor.insert_text(1, "x", &italic()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("a", bold())
            .insert("x", bold().with("italic", true))
            .insert("b", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_crlf_is_one_break() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    let change = editor.insert_text(1, "x\r\ny", &plain()).unwrap();
    assert_eq!(change, Delta::new().retain(1, plain()).insert("x\ny", plain()));
    assert_eq!(editor.get_delta(), Delta::new().insert("ax\nyb\n", plain()));
}

#[test]
fn test_text_before_block_embed() {
    let mut editor = text_then_video();
    editor.insert_text(5, "ab\ncd", &plain()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("0123\nab\ncd\n", plain())
            .insert_embed(video(), plain())
    );
}

#[test]
fn test_block_embed_splits_line() {
    let mut editor = editor(Delta::new().insert("abcd", plain()).insert(
        "\n",
        AttributeMap::new().with("align", "center"),
    ));
    editor
        .insert_embed(2, video(), &AttributeMap::new().with("width", "300"))
        .unwrap();
    let center = AttributeMap::new().with("align", "center");
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("ab", plain())
            .insert("\n", center.clone())
            .insert_embed(video(), AttributeMap::new().with("width", "300"))
            .insert("cd", plain())
            .insert("\n", center)
    );
}

#[test]
fn test_unregistered_embed_is_rejected() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    let result = editor.insert_embed(0, quire_core::Embed::new("sparkle", true), &plain());
    assert!(matches!(
        result,
        Err(quire_core::EditorError::MalformedLinearForm(_))
    ));
    assert_eq!(editor.get_delta(), Delta::new().insert("ab\n", plain()));
}

#[test]
fn test_null_formats_are_never_stored() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    editor
        .insert_text(0, "x", &AttributeMap::new().with("bold", AttrValue::Null))
        .unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("xab\n", plain()));
}
