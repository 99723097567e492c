// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use quire_core::{Editor, Registry};
use quire_delta::{AttributeMap, Delta, Embed};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(change) = serde_json::from_slice::<Delta>(data) else {
        return;
    };
    let seed = Delta::new()
        .insert("Hello", AttributeMap::new().with("bold", true))
        .insert("\n", AttributeMap::new().with("header", 1))
        .insert_embed(Embed::new("video", "#"), AttributeMap::new())
        .insert("World\n", AttributeMap::new());
    let Ok(mut editor) = Editor::from_delta(Arc::new(Registry::standard()), &seed) else {
        return;
    };

    let _ = editor.apply_delta(&change);
    assert!(editor.document().validate(editor.registry()).is_ok());
    assert_eq!(editor.get_delta().length(), editor.length());

    let _ = editor.insert_contents(0, &change);
    assert!(editor.document().validate(editor.registry()).is_ok());
});
