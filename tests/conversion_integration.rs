// tests/conversion_integration.rs

//! End-to-end tests for converting a Billfish pack into a Lingquan archive
//!
//! Each test builds a `.BillfishPack` in a temp directory, runs the whole
//! pipeline against it and inspects the resulting `.lqpack`.

mod common;

use bf2lq::{
    AssetInfo, CallbackProgress, ContentId, ConvertConfig, Converter, Error, MatchPolicy, Phase,
    Precondition, ProgressEvent, SilentProgress,
};
use common::{PackBuilder, PackEntry, read_lqpack, resource_ids};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn silent(config: &ConvertConfig) -> Converter {
    Converter::new(config.clone()).with_progress(Box::new(SilentProgress::new()))
}

fn sidecar(entries: &std::collections::BTreeMap<String, PackEntry>, id: &ContentId) -> AssetInfo {
    let key = format!("output.lingquan/resources/{}/__info.json", id);
    match entries.get(&key) {
        Some(PackEntry::File(content)) => serde_json::from_slice(content).unwrap(),
        other => panic!("expected sidecar at {key}, found {other:?}"),
    }
}

#[test]
fn test_converts_resolvable_entry_with_tags_and_note() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());

    PackBuilder::new()
        .entry(1, "sunset.png", 1)
        .entry(2, "lost.jpg", 2)
        .tag(10, "landscape")
        .assign_tag(1, 10)
        .user_data(1, None, "hello", None)
        .file("photos/sunset.png", b"sunset pixels")
        .write(&config.input);

    let report = silent(&config).run().unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.converted, 1);
    assert_eq!(report.missing, vec!["lost.jpg".to_string()]);

    let entries = read_lqpack(&config.output);
    let id = ContentId::from_bytes(b"sunset pixels");
    assert_eq!(resource_ids(&entries), vec![id.to_string()]);

    assert_eq!(
        entries.get(&format!("output.lingquan/resources/{}/sunset.png", id)),
        Some(&PackEntry::File(b"sunset pixels".to_vec()))
    );

    let info = sidecar(&entries, &id);
    assert_eq!(info.tags, vec!["landscape".to_string()]);
    assert_eq!(info.note.as_deref(), Some("hello"));
    assert_eq!(info.name, "sunset");
    assert_eq!(info.ext.as_deref(), Some("png"));
    assert_eq!(info.time, Some(1_650_000_000));
    assert_eq!(info.revision_time, Some(1_660_000_000));

    // Lingquan's format detector needs this directory, empty
    assert_eq!(
        entries.get("output.lingquan/materialPackage"),
        Some(&PackEntry::Dir)
    );
    assert!(
        !entries
            .keys()
            .any(|k| k.starts_with("output.lingquan/materialPackage/"))
    );

    // Staging state is gone, the input is untouched
    assert!(!config.temp_dir.exists());
    assert!(config.input.exists());
}

#[test]
fn test_one_resource_per_resolvable_entry() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());

    PackBuilder::new()
        .entry(1, "a.png", 1)
        .entry(2, "b.png", 1)
        .entry(3, "c.jpg", 2)
        .entry(4, "d.jpg", 2)
        .entry(5, "e.jpg", 2)
        .file("a.png", b"a")
        .file("nested/deeper/c.jpg", b"c")
        .file("x/e.jpg", b"e")
        .write(&config.input);

    let report = silent(&config).run().unwrap();
    assert_eq!(report.converted, 3);
    assert_eq!(report.missing.len(), 2);
    assert_eq!(resource_ids(&read_lqpack(&config.output)).len(), 3);
}

#[test]
fn test_identical_content_is_written_once() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());

    PackBuilder::new()
        .entry(1, "one.png", 1)
        .entry(2, "two.png", 1)
        .file("one.png", b"same")
        .file("copies/two.png", b"same")
        .write(&config.input);

    let report = silent(&config).run().unwrap();
    assert_eq!(report.converted, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(
        resource_ids(&read_lqpack(&config.output)),
        vec![ContentId::from_bytes(b"same").to_string()]
    );
}

#[test]
fn test_metadata_dir_is_never_a_source() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());

    PackBuilder::new()
        .entry(1, "cover.png", 1)
        .file(".bf/cover.png", b"thumbnail cache")
        .write(&config.input);

    let report = silent(&config).run().unwrap();
    assert_eq!(report.converted, 0);
    assert_eq!(report.missing, vec!["cover.png".to_string()]);
    assert!(resource_ids(&read_lqpack(&config.output)).is_empty());
}

#[test]
fn test_reject_ambiguous_names() {
    let temp_dir = TempDir::new().unwrap();
    let config =
        ConvertConfig::in_dir(temp_dir.path()).with_match_policy(MatchPolicy::RejectAmbiguous);

    PackBuilder::new()
        .entry(1, "logo.png", 1)
        .file("a/logo.png", b"first")
        .file("b/logo.png", b"second")
        .write(&config.input);

    let report = silent(&config).run().unwrap();
    assert_eq!(report.ambiguous, vec!["logo.png".to_string()]);
    assert!(resource_ids(&read_lqpack(&config.output)).is_empty());
}

#[test]
fn test_phases_run_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());
    PackBuilder::new()
        .entry(1, "a.png", 1)
        .file("a.png", b"a")
        .write(&config.input);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    let progress = CallbackProgress::new(move |event| {
        events_clone.lock().unwrap().push(event);
    });

    Converter::new(config.clone())
        .with_progress(Box::new(progress))
        .run()
        .unwrap();

    let messages: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Message(m) => Some(m.clone()),
            _ => None,
        })
        .collect();

    let expected: Vec<String> = [
        Phase::Extracting,
        Phase::Converting,
        Phase::ClosingLibrary,
        Phase::Packaging,
        Phase::CleaningUp,
    ]
    .iter()
    .map(|p| p.to_string())
    .collect();
    assert_eq!(messages, expected);

    let captured = events.lock().unwrap();
    assert!(matches!(captured.last(), Some(ProgressEvent::Finished(_))));
}

#[test]
fn test_second_run_refuses_existing_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());
    PackBuilder::new()
        .entry(1, "a.png", 1)
        .file("a.png", b"a")
        .write(&config.input);

    silent(&config).run().unwrap();
    let first = fs::read(&config.output).unwrap();

    let err = silent(&config).run().unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(Precondition::StaleOutput(_))
    ));
    assert_eq!(fs::read(&config.output).unwrap(), first);
}

#[test]
fn test_packaging_failure_keeps_staging() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = ConvertConfig::in_dir(temp_dir.path());
    config.output = temp_dir.path().join("missing-dir/output.lqpack");
    PackBuilder::new()
        .entry(1, "a.png", 1)
        .file("a.png", b"a")
        .write(&config.input);

    let err = silent(&config).run().unwrap_err();
    assert!(matches!(err, Error::Packaging { .. }));

    // Converted resources are still staged for inspection
    let staged = bf2lq::config::resources_dir(&config.temp_dir)
        .join(ContentId::from_bytes(b"a").as_str())
        .join("a.png");
    assert!(staged.exists());
    assert!(!config.output.exists());

    // And the next run refuses to start over them
    config.output = temp_dir.path().join("output.lqpack");
    let err = silent(&config).run().unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(Precondition::StaleWorkDir(_))
    ));
}

#[test]
fn test_pack_without_library() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());
    PackBuilder::new()
        .without_library()
        .file("a.png", b"a")
        .write(&config.input);

    let err = silent(&config).run().unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
    assert!(config.temp_dir.exists());
    assert!(!config.output.exists());
}

#[test]
fn test_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConvertConfig::in_dir(temp_dir.path());

    let err = silent(&config).run().unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(Precondition::MissingInput(_))
    ));
    assert!(!config.temp_dir.exists());
}
