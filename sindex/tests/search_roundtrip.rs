//! End-to-end exercise of the owner-side pipeline: derive a schedule, build
//! and persist indexes for a small collection, reload everything from disk,
//! and run keyword queries the way the search server does.

use rand::rngs::OsRng;
use sindex::codec;
use sindex::index::{build_index, matches, DEFAULT_SCALING};
use sindex::keys::KeySchedule;
use sindex::prf::{derive_trapdoor, HmacSha256};

fn collection() -> Vec<(&'static str, Vec<String>)> {
    vec![
        ("a.txt", vec!["foo".to_string()]),
        ("b.txt", vec!["bar".to_string()]),
        ("c.txt", vec!["foo".to_string(), "bar".to_string()]),
    ]
}

fn search(dir: &std::path::Path, schedule: &KeySchedule, keyword: &str) -> Vec<String> {
    let trapdoor = derive_trapdoor(&HmacSha256, schedule, keyword).unwrap();
    let mut found = Vec::new();
    for (doc_id, _) in collection() {
        let path = dir.join(format!("{doc_id}{}", codec::INDEX_SUFFIX));
        let filter = codec::read_index_file(&path).unwrap();
        if matches(&HmacSha256, &filter, &trapdoor, doc_id) {
            found.push(doc_id.to_string());
        }
    }
    found.sort();
    found
}

#[test]
fn collection_search_finds_the_right_documents() {
    let dir = tempfile::tempdir().unwrap();
    let schedule = KeySchedule::generate(0.01).unwrap();
    assert_eq!(schedule.hash_count(), 7);

    for (doc_id, keywords) in collection() {
        let filter = build_index(
            &HmacSha256,
            &mut OsRng,
            &schedule,
            doc_id,
            &keywords,
            keywords.len(),
            DEFAULT_SCALING,
        )
        .unwrap();
        let path = dir.path().join(format!("{doc_id}{}", codec::INDEX_SUFFIX));
        codec::write_index_file(&path, &filter).unwrap();
    }

    assert_eq!(search(dir.path(), &schedule, "foo"), vec!["a.txt", "c.txt"]);
    assert_eq!(search(dir.path(), &schedule, "bar"), vec!["b.txt", "c.txt"]);
    // "baz" was never indexed; allow at most one Bloom false positive.
    assert!(search(dir.path(), &schedule, "baz").len() <= 1);
}

#[test]
fn persisted_key_schedule_round_trips_and_keeps_working() {
    let dir = tempfile::tempdir().unwrap();
    let schedule = KeySchedule::generate(0.01).unwrap();
    let key_path = dir.path().join(format!("docs{}", codec::KEY_SUFFIX));
    codec::write_key_file(&key_path, &schedule).unwrap();
    let reloaded = codec::read_key_file(&key_path).unwrap();
    assert_eq!(reloaded, schedule);

    let filter = build_index(
        &HmacSha256,
        &mut OsRng,
        &schedule,
        "alice.txt",
        &["rabbit".to_string()],
        40,
        DEFAULT_SCALING,
    )
    .unwrap();
    let trapdoor = derive_trapdoor(&HmacSha256, &reloaded, "rabbit").unwrap();
    assert!(matches(&HmacSha256, &filter, &trapdoor, "alice.txt"));
}
