use crate::helpers::*;
use pretty_assertions::assert_eq;
use quire_core::{AttributeMap, Delta, EditorError};

fn bold_italic() -> AttributeMap {
    bold().with("italic", true)
}

#[test]
fn test_inner_node() {
    let mut editor = editor(Delta::new().insert("0123", bold_italic()).insert("\n", plain()));
    let change = editor.delete_text(1, 2).unwrap();
    assert_eq!(change, Delta::new().retain(1, plain()).delete(2));
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("03", bold_italic()).insert("\n", plain())
    );
}

#[test]
fn test_parts_of_multiple_lines() {
    let mut editor = editor(
        Delta::new()
            .insert("0123", italic())
            .insert("\n", plain())
            .insert("5678", italic())
            .insert("\n", plain()),
    );
    editor.delete_text(2, 5).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("0178", italic()).insert("\n", plain())
    );
}

#[test]
fn test_entire_line_keeping_newline() {
    let mut editor = editor(Delta::new().insert("0123", bold_italic()).insert("\n", plain()));
    editor.delete_text(0, 4).unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("\n", plain()));
    assert_eq!(html(&editor), "<p><br></p>");
}

#[test]
fn test_newline() {
    let mut editor = editor(
        Delta::new()
            .insert("0123", italic())
            .insert("\n", plain())
            .insert("5678", italic())
            .insert("\n", plain()),
    );
    editor.delete_text(4, 1).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("01235678", italic()).insert("\n", plain())
    );
}

#[test]
fn test_joined_line_keeps_later_line_formats() {
    let mut editor = editor(
        Delta::new()
            .insert("ab", plain())
            .insert("\n", AttributeMap::new().with("header", 1))
            .insert("cd", plain())
            .insert("\n", AttributeMap::new().with("list", "bullet")),
    );
    let before = editor.get_delta();
    let change = editor.delete_text(2, 1).unwrap();
    assert_eq!(editor.get_delta(), before.compose(&change));
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("abcd", plain())
            .insert("\n", AttributeMap::new().with("list", "bullet"))
    );
}

#[test]
fn test_entire_document() {
    let mut editor = editor(Delta::new().insert("0123", bold_italic()).insert("\n", plain()));
    editor.delete_text(0, 5).unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("\n", plain()));
    assert!(editor.is_blank());
}

#[test]
fn test_multiple_complete_lines() {
    let mut editor = editor(
        Delta::new()
            .insert("012", italic())
            .insert("\n", plain())
            .insert("456", italic())
            .insert("\n", plain())
            .insert("890", italic())
            .insert("\n", plain()),
    );
    editor.delete_text(0, 8).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("890", italic()).insert("\n", plain())
    );
}

#[test]
fn test_block_embed() {
    let mut editor = editor(
        Delta::new()
            .insert("ab\n", plain())
            .insert_embed(video(), plain())
            .insert("cd\n", plain()),
    );
    editor.delete_text(3, 1).unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("ab\ncd\n", plain()));
}

#[test]
fn test_break_before_block_embed_is_kept() {
    let mut editor = editor(
        Delta::new()
            .insert("ab\n", plain())
            .insert_embed(video(), plain())
            .insert("\n", plain()),
    );
    editor.delete_text(1, 2).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("a\n", plain())
            .insert_embed(video(), plain())
            .insert("\n", plain())
    );
}

#[test]
fn test_deleting_line_before_block_embed_keeps_break() {
    let mut editor = editor(
        Delta::new()
            .insert("aa", plain())
            .insert_embed(image(), plain())
            .insert("\n", plain())
            .insert_embed(video(), plain())
            .insert("\n\n", plain()),
    );
    let removed = editor.get_contents(2, 2).unwrap();
    editor.delete_text(2, 2).unwrap();
    // The line before a block embed cannot give up its break.
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("aa\n", plain())
            .insert_embed(video(), plain())
            .insert("\n\n", plain())
    );
    assert_eq!(editor.length(), 6);

    // So putting the removed contents back leaves one break too many.
    editor.insert_contents(2, &removed).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("aa", plain())
            .insert_embed(image(), plain())
            .insert("\n\n", plain())
            .insert_embed(video(), plain())
            .insert("\n\n", plain())
    );
}

#[test]
fn test_zero_length_is_noop() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    editor.delete_text(1, 0).unwrap();
    assert_eq!(editor.get_delta(), Delta::new().insert("ab\n", plain()));
}

#[test]
fn test_past_end_is_out_of_range() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    assert!(matches!(
        editor.delete_text(1, 3),
        Err(EditorError::OutOfRange { .. })
    ));
    assert_eq!(editor.get_delta(), Delta::new().insert("ab\n", plain()));
}
