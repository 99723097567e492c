use crate::helpers::*;
use pretty_assertions::assert_eq;
use quire_core::{AttributeMap, Delta, EditorError};

fn line(kind: &str, indent: i64) -> AttributeMap {
    let attributes = AttributeMap::new().with("list", kind);
    if indent > 0 {
        attributes.with("indent", indent)
    } else {
        attributes
    }
}

fn lines(items: &[(&str, AttributeMap)]) -> Delta {
    items.iter().fold(Delta::new(), |delta, (text, attributes)| {
        delta
            .insert(*text, plain())
            .insert("\n", attributes.clone())
    })
}

#[test]
fn test_inline() {
    let editor = editor(lines(&[("Test", AttributeMap::new().with("blockquote", true))]));
    assert_eq!(editor.get_html(1, 2).unwrap(), "es");
}

#[test]
fn test_whole_line_keeps_block_tag() {
    let editor = editor(lines(&[("Test", AttributeMap::new().with("blockquote", true))]));
    assert_eq!(editor.get_html(0, 5).unwrap(), "<blockquote>Test</blockquote>");
}

#[test]
fn test_across_lines() {
    let editor = editor(lines(&[
        ("Header", AttributeMap::new().with("header", 1).with("align", "center")),
        ("Text", plain()),
        ("Quote", AttributeMap::new().with("blockquote", true)),
    ]));
    assert_eq!(
        editor.get_html(1, 14).unwrap(),
        "<h1 class=\"ql-align-center\">eader</h1><p>Text</p><blockquote>Quo</blockquote>"
    );
}

#[test]
fn test_mixed_list() {
    let editor = editor(lines(&[
        ("One", line("ordered", 0)),
        ("Two", line("ordered", 0)),
        ("Foo", line("bullet", 0)),
        ("Bar", line("bullet", 0)),
    ]));
    assert_eq!(
        editor.get_html(2, 12).unwrap(),
        "<ol><li>e</li><li>Two</li></ol><ul><li>Foo</li><li>Ba</li></ul>"
    );
}

#[test]
fn test_nested_list() {
    let editor = editor(lines(&[
        ("One", line("ordered", 0)),
        ("Two", line("ordered", 0)),
        ("Alpha", line("bullet", 1)),
        ("I", line("ordered", 2)),
        ("II", line("ordered", 2)),
        ("Three", line("ordered", 0)),
    ]));
    assert_eq!(
        editor.get_html(2, 20).unwrap(),
        "<ol><li>e</li><li>Two<ul><li>Alpha<ol><li>I</li><li>II</li></ol></li></ul></li><li>Thr</li></ol>"
    );
}

#[test]
fn test_nested_checklist() {
    let editor = editor(lines(&[
        ("One", line("checked", 0)),
        ("Two", line("checked", 0)),
        ("Alpha", line("unchecked", 1)),
        ("I", line("checked", 2)),
        ("II", line("checked", 2)),
        ("Three", line("checked", 0)),
    ]));
    assert_eq!(
        editor.get_html(2, 20).unwrap(),
        "<ul><li data-list=\"checked\">e</li><li data-list=\"checked\">Two\
         <ul><li data-list=\"unchecked\">Alpha\
         <ul><li data-list=\"checked\">I</li><li data-list=\"checked\">II</li></ul>\
         </li></ul></li><li data-list=\"checked\">Thr</li></ul>"
    );
}

#[test]
fn test_partial_list() {
    let editor = editor(lines(&[
        ("1111", line("ordered", 0)),
        ("AAAA", line("ordered", 1)),
        ("IIII", line("ordered", 2)),
        ("BBBB", line("ordered", 1)),
        ("2222", line("ordered", 0)),
    ]));
    assert_eq!(
        editor.get_html(12, 12).unwrap(),
        "<ol><li><ol><li><ol><li>II</li></ol></li><li>BBBB</li></ol></li><li>2222</li></ol>"
    );
}

#[test]
fn test_escape_html() {
    let mut editor = blank();
    editor.insert_text(0, "<b>Test</b>", &plain()).unwrap();
    assert_eq!(
        editor.get_html(0, 11).unwrap(),
        "&lt;b&gt;Test&lt;/b&gt;"
    );
}

#[test]
fn test_multiline_code() {
    let mut editor = editor(Delta::new().insert("\n0123\n\n\n4567\n\n", plain()));
    let length = editor.length();
    editor
        .format_line(
            0,
            length,
            &AttributeMap::new().with("code-block", "javascript"),
        )
        .unwrap();

    assert_eq!(
        editor.get_html(0, length).unwrap(),
        "<pre>\n\n0123\n\n\n4567\n\n</pre>"
    );
    assert_eq!(editor.get_html(1, 7).unwrap(), "<pre>\n0123\n\n\n\n</pre>");
    assert_eq!(editor.get_html(2, 7).unwrap(), "<pre>\n123\n\n\n4\n</pre>");
    assert_eq!(editor.get_html(5, 7).unwrap(), "<pre>\n\n\n\n4567\n</pre>");
}

#[test]
fn test_attributors_render_in_span() {
    let editor = editor(
        Delta::new()
            .insert(
                "a",
                bold()
                    .with("color", "red")
                    .with("size", "large"),
            )
            .insert("\n", plain()),
    );
    assert_eq!(
        html(&editor),
        "<p><strong><span class=\"ql-size-large\" style=\"color: red;\">a</span></strong></p>"
    );
}

#[test]
fn test_empty_range() {
    let editor = editor(Delta::new().insert("ab\n", plain()));
    assert_eq!(editor.get_html(1, 0).unwrap(), "");
}

#[test]
fn test_out_of_range() {
    let editor = editor(Delta::new().insert("ab\n", plain()));
    assert!(matches!(
        editor.get_html(1, 3),
        Err(EditorError::OutOfRange { .. })
    ));
}
