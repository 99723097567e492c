use crate::helpers::*;
use pretty_assertions::assert_eq;
use quire_core::{AttributeMap, Delta, EditorError};

#[test]
fn test_unwrap() {
    let mut editor = editor(
        Delta::new()
            .insert("0", plain())
            .insert("12", italic())
            .insert("3\n", plain()),
    );
    editor.remove_format(1, 2).unwrap();
    assert_eq!(html(&editor), "<p>0123</p>");
}

#[test]
fn test_split_inline() {
    let strong_em = bold().with("italic", true);
    let mut editor = editor(
        Delta::new()
            .insert("0", plain())
            .insert("12", strong_em.clone())
            .insert("3\n", plain()),
    );
    editor.remove_format(1, 1).unwrap();
    assert_eq!(html(&editor), "<p>01<strong><em>2</em></strong>3</p>");
}

#[test]
fn test_partial_line() {
    let mut editor = editor(
        Delta::new()
            .insert("01", plain())
            .insert("\n", AttributeMap::new().with("header", 1))
            .insert("34", plain())
            .insert("\n", AttributeMap::new().with("list", "ordered")),
    );
    editor.remove_format(1, 3).unwrap();
    assert_eq!(html(&editor), "<p>01</p><p>34</p>");
}

#[test]
fn test_remove_embed() {
    let mut editor = editor(
        Delta::new()
            .insert("0", plain())
            .insert_embed(image(), plain())
            .insert("2\n", plain()),
    );
    editor.remove_format(1, 1).unwrap();
    assert_eq!(html(&editor), "<p>02</p>");
}

#[test]
fn test_combined() {
    let mut editor = editor(
        Delta::new()
            .insert("01", plain())
            .insert_embed(image(), plain())
            .insert("3", plain())
            .insert("\n", AttributeMap::new().with("header", 1))
            .insert("5", plain())
            .insert("6", bold())
            .insert("78", bold().with("italic", true))
            .insert("9", bold())
            .insert("0", plain())
            .insert("\n", AttributeMap::new().with("list", "ordered")),
    );
    editor.remove_format(1, 7).unwrap();
    assert_eq!(
        html(&editor),
        "<p>013</p><p>567<strong><em>8</em>9</strong>0</p>"
    );
}

#[test]
fn test_end_of_document() {
    let ordered = AttributeMap::new().with("list", "ordered");
    let mut editor = editor(
        Delta::new()
            .insert("0123", plain())
            .insert("\n", ordered.clone())
            .insert("5678", plain())
            .insert("\n", ordered),
    );
    editor.remove_format(0, 10).unwrap();
    assert_eq!(html(&editor), "<p>0123</p><p>5678</p>");
}

#[test]
fn test_before_block_embed() {
    let mut editor = editor(
        Delta::new()
            .insert("ab", bold())
            .insert("\n", AttributeMap::new().with("header", 1))
            .insert_embed(video(), AttributeMap::new().with("align", "center"))
            .insert("\n", plain()),
    );
    editor.remove_format(0, 3).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("ab\n", plain())
            .insert_embed(video(), AttributeMap::new().with("align", "center"))
            .insert("\n", plain())
    );
}

#[test]
fn test_past_end_is_out_of_range() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    assert!(matches!(
        editor.remove_format(0, 12),
        Err(EditorError::OutOfRange { .. })
    ));
}
