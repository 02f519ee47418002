//! File comment store integration tests.

use ballot_rs_comments::{
    CommentError, CommentKind, CommentStore, FileCommentStore, views,
};
use ballot_rs_test_utils::{StubNames, scratch_store};
use chrono::Utc;
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use std::thread;

/// An appended comment comes back last with the same fields.
#[test]
fn append_then_load_round_trips() {
    let scratch = scratch_store();
    let before = Utc::now();
    let stored = scratch
        .store
        .append("ada@example.com", "opt1", "hello")
        .expect("append");
    let after = Utc::now();

    let records = scratch.store.load("opt1").expect("load");
    let last = records.last().expect("record");
    assert_eq!(last, &stored);
    assert_eq!(last.author, "ada@example.com");
    assert_eq!(last.option_id, "opt1");
    assert_eq!(last.body, "hello");
    assert_eq!(last.kind, CommentKind::Comment);
    assert!(before <= last.timestamp && last.timestamp <= after);
}

/// Options with no file load as empty.
#[test]
fn missing_option_loads_empty() {
    let scratch = scratch_store();
    assert_eq!(scratch.store.load("never-written").expect("load"), Vec::new());
    assert!(!scratch.option_path("never-written").exists());
}

/// Empty fields fail before touching the option file.
#[test]
fn empty_fields_are_rejected_without_io() {
    let scratch = scratch_store();
    scratch.store.append("u", "opt1", "original").expect("append");
    let path = scratch.option_path("opt1");
    let before = fs::read(&path).expect("read");

    for (author, option_id, body) in [("", "opt1", "hello"), ("u", "", "hello"), ("u", "opt1", "")] {
        let err = scratch.store.append(author, option_id, body).unwrap_err();
        assert!(err.is_validation(), "{author:?}/{option_id:?}/{body:?}");
        assert_eq!(
            err.to_string(),
            "comments: could not create comment with given information"
        );
    }

    assert_eq!(fs::read(&path).expect("read"), before);
}

/// Sequential appends accumulate in append order.
#[test]
fn appends_accumulate_in_order() {
    let scratch = scratch_store();
    for body in ["first", "second", "third"] {
        scratch.store.append("u", "opt1", body).expect("append");
    }

    let records = scratch.store.load("opt1").expect("load");
    let bodies: Vec<_> = records.iter().map(|record| record.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
    assert!(
        records
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    );
}

/// Appending to one option leaves the others untouched.
#[test]
fn options_are_isolated() {
    let scratch = scratch_store();
    scratch.store.append("u", "b", "on b").expect("append b");
    let b_before = scratch.store.load("b").expect("load b");

    scratch.store.append("u", "a", "on a").expect("append a");

    assert_eq!(scratch.store.load("b").expect("load b"), b_before);
    assert_eq!(scratch.store.load("a").expect("load a").len(), 1);
}

/// Repeated loads return equal collections.
#[test]
fn load_is_idempotent() {
    let scratch = scratch_store();
    scratch.store.append("u", "opt1", "one").expect("append");
    scratch.store.append("v", "opt1", "two").expect("append");

    let first = scratch.store.load("opt1").expect("load");
    let second = scratch.store.load("opt1").expect("load");
    assert_eq!(first, second);
}

/// Concurrent appends to one option all survive.
#[test]
fn concurrent_appends_keep_every_comment() {
    let scratch = scratch_store();
    let store = Arc::new(FileCommentStore::new(scratch.root()).expect("store"));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..10 {
                    store
                        .append(&format!("user{worker}"), "hot", &format!("{worker}-{n}"))
                        .expect("append");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let mut bodies: Vec<_> = store
        .load("hot")
        .expect("load")
        .into_iter()
        .map(|record| record.body)
        .collect();
    bodies.sort();
    let mut expected: Vec<_> = (0..8)
        .flat_map(|worker| (0..10).map(move |n| format!("{worker}-{n}")))
        .collect();
    expected.sort();
    assert_eq!(bodies, expected);
}

/// Concurrent appends through separate store instances rely on the file lock.
#[test]
fn concurrent_appends_from_separate_stores_keep_every_comment() {
    let scratch = scratch_store();
    let root = scratch.root().to_path_buf();
    let handles: Vec<_> = (0..6)
        .map(|worker| {
            let root = root.clone();
            thread::spawn(move || {
                let store = FileCommentStore::new(&root).expect("store");
                for n in 0..15 {
                    store
                        .append(&format!("user{worker}"), "shared", &format!("{worker}-{n}"))
                        .expect("append");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let records = scratch.store.load("shared").expect("load");
    assert_eq!(records.len(), 6 * 15);
    for worker in 0..6 {
        let mine: Vec<_> = records
            .iter()
            .filter(|record| record.author == format!("user{worker}"))
            .map(|record| record.body.clone())
            .collect();
        let expected: Vec<_> = (0..15).map(|n| format!("{worker}-{n}")).collect();
        assert_eq!(mine, expected);
    }
}

/// Separate store instances over one root do not lose each other's writes.
#[test]
fn independent_stores_share_files() {
    let scratch = scratch_store();
    let other = FileCommentStore::new(scratch.root()).expect("store");
    scratch.store.append("u", "opt1", "from first").expect("append");
    other.append("v", "opt1", "from second").expect("append");

    let records = scratch.store.load("opt1").expect("load");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].author, "v");
}

/// Pro and con kinds persist as given.
#[test]
fn explicit_kinds_round_trip() {
    let scratch = scratch_store();
    scratch
        .store
        .append_with_kind("u", "opt1", "cheap", CommentKind::Pro)
        .expect("pro");
    scratch
        .store
        .append_with_kind("u", "opt1", "slow", CommentKind::Con)
        .expect("con");

    let kinds: Vec<_> = scratch
        .store
        .load("opt1")
        .expect("load")
        .into_iter()
        .map(|record| record.kind)
        .collect();
    assert_eq!(kinds, vec![CommentKind::Pro, CommentKind::Con]);
}

/// Bodies are stored verbatim, including markup and newlines.
#[test]
fn body_is_stored_verbatim() {
    let scratch = scratch_store();
    let body = "<a href=\"x\">link</a>\nsecond line \u{1F5F3}";
    scratch.store.append("u", "opt1", body).expect("append");
    assert_eq!(scratch.store.load("opt1").expect("load")[0].body, body);
    assert_eq!(
        fs::read_to_string(scratch.option_path("opt1"))
            .expect("read")
            .lines()
            .count(),
        1
    );
}

/// Garbage on disk surfaces as corrupt data rather than an empty list.
#[test]
fn corrupt_file_is_reported() {
    let scratch = scratch_store();
    fs::write(scratch.option_path("opt1"), [0xff, 0xfe, b'\n']).expect("write");

    let err = scratch.store.load("opt1").unwrap_err();
    assert!(matches!(err, CommentError::Corrupt { line: 1, .. }));
}

/// Ids that would escape the storage root are rejected.
#[test]
fn path_like_option_ids_are_rejected() {
    let scratch = scratch_store();
    let err = scratch.store.append("u", "../outside", "x").unwrap_err();
    assert!(err.is_validation());
    assert!(scratch.store.load("../outside").unwrap_err().is_validation());
}

/// A store built from config writes under the configured root.
#[test]
fn store_from_config_uses_configured_root() {
    let scratch = scratch_store();
    let config = scratch.config();
    let store = FileCommentStore::from_config(&config.storage).expect("store");
    store.append("u", "opt1", "configured").expect("append");

    assert!(scratch.option_path("opt1").exists());
    assert_eq!(scratch.store.load("opt1").expect("load").len(), 1);
}

/// Loaded records feed the presentation view with resolved names.
#[test]
fn views_resolve_author_names_in_order() {
    let scratch = scratch_store();
    scratch.store.append("ada@example.com", "opt1", "one").expect("append");
    scratch.store.append("bob@example.com", "opt1", "two").expect("append");
    let names = StubNames::new().with_name("ada@example.com", "Ada Lovelace");

    let rendered = views(&scratch.store.load("opt1").expect("load"), &names);
    let authors: Vec<_> = rendered.iter().map(|view| view.author_name.as_str()).collect();
    assert_eq!(authors, vec!["Ada Lovelace", "bob@example.com"]);
    assert!(rendered.iter().all(|view| view.date.contains(" at ")));
}
