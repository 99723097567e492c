use crate::helpers::*;
use pretty_assertions::assert_eq;
use quire_core::{AttrValue, AttributeMap, Delta};

#[test]
fn test_format_line() {
    let mut editor = editor(Delta::new().insert("0123\n", plain()));
    editor
        .format_line(1, 1, &AttributeMap::new().with("header", 1))
        .unwrap();
    assert_eq!(html(&editor), "<h1>0123</h1>");
}

#[test]
fn test_format_text_inline_and_line() {
    let mut editor = editor(Delta::new().insert("ab\ncd\n", plain()));
    let formats = AttributeMap::new()
        .with("bold", true)
        .with("align", "right");
    let change = editor.format_text(1, 2, &formats).unwrap();
    assert_eq!(
        change,
        Delta::new().retain(1, plain()).retain(2, formats.clone())
    );
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("a", plain())
            .insert("b", bold())
            .insert("\n", AttributeMap::new().with("align", "right"))
            .insert("cd\n", plain())
    );
}

#[test]
fn test_format_text_removes_with_null() {
    let mut editor = editor(Delta::new().insert("abcd", bold()).insert("\n", plain()));
    editor
        .format_text(1, 2, &AttributeMap::new().with("bold", AttrValue::Null))
        .unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("a", bold())
            .insert("bc", plain())
            .insert("d", bold())
            .insert("\n", plain())
    );
}

#[test]
fn test_line_kinds_replace_each_other() {
    let mut editor = editor(
        Delta::new()
            .insert("ab", plain())
            .insert("\n", AttributeMap::new().with("header", 1).with("align", "center")),
    );
    editor
        .format_line(0, 2, &AttributeMap::new().with("list", "ordered"))
        .unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("ab", plain()).insert(
            "\n",
            AttributeMap::new()
                .with("align", "center")
                .with("list", "ordered")
        )
    );
}

#[test]
fn test_format_line_reaches_block_embed() {
    let mut editor = text_then_video();
    editor
        .format_line(0, 6, &AttributeMap::new().with("align", "center").with("header", 2))
        .unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new()
            .insert("0123", plain())
            .insert("\n", AttributeMap::new().with("align", "center").with("header", 2))
            .insert_embed(video(), AttributeMap::new().with("align", "center"))
    );
}

#[test]
fn test_inline_formats_skip_line_breaks() {
    let mut editor = editor(Delta::new().insert("ab\n", plain()));
    editor.format_text(0, 3, &italic()).unwrap();
    assert_eq!(
        editor.get_delta(),
        Delta::new().insert("ab", italic()).insert("\n", plain())
    );
}
