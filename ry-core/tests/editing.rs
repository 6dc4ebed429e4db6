// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! End-to-end behavior of the editing engine through its public API.

use ry_core::mode::action;
use ry_core::{
    Buffer, Config, Editor, KeyEvent, KeySequence, Keymap, Location, Orientation, Rect,
    SequenceMatcher, TextStore, WindowTree,
};
use slotmap::SlotMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, name: &'static str) -> ry_core::Action {
    let log = log.clone();
    action(move |_, _, keys| {
        log.lock().unwrap().push(format!("{name}:{keys}"));
    })
}

fn feed(matcher: &mut SequenceMatcher, keymap: &Keymap, notation: &str, editor: &mut Editor) {
    let keys: KeySequence = notation.parse().unwrap();
    let buffer = editor.current_buffer_id();
    for key in keys.events() {
        for invocation in matcher.feed(*key, &[keymap]) {
            (invocation.action)(editor, buffer, &invocation.keys);
        }
    }
}

#[test]
fn text_store_length_accounting() {
    let mut store = TextStore::new();
    store.insert(0, "héllo");
    store.insert(5, " wörld");
    assert_eq!(store.len(), 11);
    store.delete(0, 6);
    assert_eq!(store.to_string(), "wörld");
    assert_eq!(store.len(), 5);
}

#[test]
fn point_stays_in_range() {
    let mut buffer = Buffer::from_text("t", "abc");
    for delta in [-10, 1, 1, 1, 1, 100, -2, -100] {
        buffer.point_move(delta);
        assert!((-1..=2).contains(&buffer.point()));
    }
    assert_eq!(buffer.point(), -1);
}

#[test]
fn insert_after_point_move() {
    let mut buffer = Buffer::from_text("t", "hello world\nfoo bar");
    assert_eq!(buffer.point(), -1);
    buffer.point_move(1);
    assert_eq!(buffer.point(), 0);
    buffer.insert(" test");
    assert!(buffer.content().starts_with("h test"));
    assert_eq!(buffer.point(), 5);
    assert_eq!(buffer.line_count(), 2);
}

#[test]
fn marks_follow_edits() {
    let mut buffer = Buffer::from_text("t", "0123456789");
    buffer.set_point(5);
    let moving = buffer.mark_create();
    let fixed = buffer.mark_create_fixed();
    buffer.set_point(-1);
    buffer.insert("ab");
    assert_eq!(buffer.mark(moving).unwrap().location, 7);
    assert_eq!(buffer.mark(fixed).unwrap().location, 5);
    assert!(buffer.mark_delete(moving).is_some());
    assert!(buffer.mark(moving).is_none());
    assert_eq!(buffer.mark_count(), 1);
}

#[test]
fn suffix_dispatch_with_prefix() {
    let log: Log = Arc::default();
    let mut keymap = Keymap::new();
    keymap.bind("j", recorder(&log, "A")).unwrap();
    keymap.bind("g g", recorder(&log, "B")).unwrap();
    let mut editor = Editor::new(Config::default()).unwrap();
    let mut matcher = SequenceMatcher::new();

    feed(&mut matcher, &keymap, "j", &mut editor);
    feed(&mut matcher, &keymap, "g", &mut editor);
    assert!(matcher.is_pending());
    feed(&mut matcher, &keymap, "g", &mut editor);
    assert_eq!(*log.lock().unwrap(), vec!["A:j", "B:g g"]);
    assert!(!matcher.is_pending());
}

#[test]
fn catch_all_runs_after_concrete_bindings() {
    let log: Log = Arc::default();
    let mut keymap = Keymap::new();
    keymap.bind("a", recorder(&log, "A")).unwrap();
    keymap.bind_default(recorder(&log, "C"));
    let mut editor = Editor::new(Config::default()).unwrap();
    let mut matcher = SequenceMatcher::new();

    feed(&mut matcher, &keymap, "a b", &mut editor);
    assert_eq!(*log.lock().unwrap(), vec!["A:a", "C:b"]);
}

#[test]
fn every_chord_reaches_an_action_beside_multi_chord_bindings() {
    let log: Log = Arc::default();
    let mut keymap = Keymap::new();
    keymap.bind("j k", recorder(&log, "escape")).unwrap();
    keymap.bind("a", recorder(&log, "A")).unwrap();
    keymap.bind_default(recorder(&log, "C"));
    let mut editor = Editor::new(Config::default()).unwrap();
    let mut matcher = SequenceMatcher::new();

    feed(&mut matcher, &keymap, "j x j j a k", &mut editor);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["C:j", "C:x", "C:j", "C:j", "A:a", "C:k"]
    );
    assert!(!matcher.is_pending());
}

#[test]
fn typed_text_survives_a_two_chord_minor_binding() {
    let mut editor = Editor::new(Config::default()).unwrap();
    let mut keymap = Keymap::new();
    keymap
        .bind("j k", action(|e, b, _| e.enter_normal_mode(b)))
        .unwrap();
    let minor = editor
        .modes
        .register(ry_core::Mode::new("escape-chord", ry_core::ModeKind::Minor, keymap));
    let buffer = editor.current_buffer_id();
    editor.with_buffer(buffer, |b| b.mode_add(minor, ry_core::ModeKind::Minor));

    let keys: KeySequence = "i j u m p".parse().unwrap();
    for key in keys.events() {
        editor.handle_key(*key);
    }
    assert_eq!(editor.current_buffer().unwrap().content(), "jump");
}

#[test]
fn overlapping_bindings_wait_for_the_longer_one() {
    let log: Log = Arc::default();
    let mut keymap = Keymap::new();
    keymap.bind("d", recorder(&log, "short")).unwrap();
    keymap.bind("d w", recorder(&log, "long")).unwrap();
    let mut editor = Editor::new(Config::default()).unwrap();
    let mut matcher = SequenceMatcher::new();

    feed(&mut matcher, &keymap, "d w", &mut editor);
    feed(&mut matcher, &keymap, "d", &mut editor);
    assert!(matcher.is_ambiguous());
    let flushed = matcher.flush().unwrap();
    let buffer = editor.current_buffer_id();
    (flushed.action)(&mut editor, buffer, &flushed.keys);
    assert_eq!(*log.lock().unwrap(), vec!["long:d w", "short:d"]);
}

#[test]
fn notation_round_trip() {
    for notation in ["a", "C-x", "C-S-a", "A-M-RET", "SPC n", "g g", "C-w s", "-", "C--", "ESC"] {
        let keys: KeySequence = notation.parse().unwrap();
        assert_eq!(keys.to_string(), notation);
    }
    assert!("C-nope".parse::<KeyEvent>().is_err());
    assert!("X-a".parse::<KeyEvent>().is_err());
}

#[test]
fn layout_and_centering() {
    let mut ids: SlotMap<ry_core::BufferId, ()> = SlotMap::with_key();
    let mut tree = WindowTree::new(ids.insert(()));
    let first = tree.current();
    let second = tree.split(Orientation::Horizontal);

    let layout = tree.layout(Rect::new(0, 0, 100, 30));
    assert_eq!(layout[0], (first, Rect::new(0, 0, 50, 30)));
    assert_eq!(layout[1], (second, Rect::new(50, 0, 50, 30)));
    let layout = tree.layout(Rect::new(0, 0, 101, 30));
    assert_eq!(layout[1].1.w, 51);

    let view = tree.current_view_mut();
    view.center_pending = true;
    view.adjust_scroll(20, 50);
    assert_eq!(view.scroll_offset, 41);
    assert!(!view.center_pending);
}

#[test]
fn word_round_trip() {
    let mut buffer = Buffer::from_text("t", "one two\nthree");
    buffer.move_to(4, 0);
    assert!(buffer.move_word_forward());
    assert_eq!(buffer.cursor(), Location::new(1, 0));
    assert!(buffer.move_word_backward());
    assert_eq!(buffer.cursor(), Location::new(0, 4));
}

#[test]
fn search_wraps_and_follows_edits() {
    let mut editor = Editor::new(Config::default()).unwrap();
    editor.open_buffer(Path::new("s.txt"), "cat dog cat");
    editor.search_find("cat");
    assert_eq!(editor.current_buffer().unwrap().cursor(), Location::new(0, 0));
    editor.search_next();
    editor.search_next();
    assert_eq!(editor.current_buffer().unwrap().cursor(), Location::new(0, 0));

    for key in "A SPC c a t ESC".parse::<KeySequence>().unwrap().events() {
        editor.handle_key(*key);
    }
    assert_eq!(editor.search.results().len(), 3);
}

#[test]
fn config_defaults_fill_missing_keys() {
    let config = Config::from_toml("numbers = false\n").unwrap();
    assert!(!config.numbers);
    assert_eq!(config.tab_width, 4);
    assert_eq!(config.jump_lines, 15);
    assert_eq!(config.sequence_timeout_ms, 500);
    assert!(config.colors.contains_key("statusbar.highlight"));
}
