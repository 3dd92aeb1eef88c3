/*!
 * Tests for the per-novel session store
 */

use std::fs;

use anyhow::Result;
use yantai::errors::SessionError;
use yantai::session::{Glossary, SessionStore, TermEntry};
use yantai::Config;

use crate::common;

fn open_store(config: &Config) -> Result<SessionStore> {
    Ok(SessionStore::open(&config.session)?)
}

/// Test that ensure_novel lays out the session directory with seed files
#[test]
fn test_ensure_novel_withFreshStore_shouldCreateLayout() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    store.ensure_novel("frost")?;

    let novel_dir = store.novel_dir("frost");
    assert!(novel_dir.join("glossary").join("terms.json").is_file());
    assert!(novel_dir.join("context_memory.txt").is_file());

    Ok(())
}

/// Test that a novel without session files loads an empty glossary
#[test]
fn test_load_glossary_withNoSession_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    let glossary = store.load_glossary("unseen")?;

    assert!(glossary.is_empty());

    Ok(())
}

/// Test that append_terms is append-only: existing renderings survive
#[test]
fn test_append_terms_withConflictingEntry_shouldKeepExistingRendering() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    let mut first = Glossary::new();
    first.insert("アカリ", "Akari");
    store.append_terms("frost", &first)?;

    let mut second = Glossary::new();
    second.insert("アカリ", "Acari");
    second.insert("魔王", "Demon Lord");
    let merged = store.append_terms("frost", &second)?;

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("アカリ").map(|e| e.target.as_str()), Some("Akari"));
    assert_eq!(merged.get("魔王").map(|e| e.target.as_str()), Some("Demon Lord"));

    // Reloading from disk sees the same state
    let reloaded = store.load_glossary("frost")?;
    assert_eq!(reloaded, merged);

    Ok(())
}

/// Test that hand-written terms.json files parse in both entry shapes
#[test]
fn test_load_glossary_withHandWrittenFile_shouldParseBothShapes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    store.ensure_novel("frost")?;
    let terms_path = store.novel_dir("frost").join("glossary").join("terms.json");
    fs::write(
        &terms_path,
        r#"{"アカリ": "Akari", "魔王": {"target": "Demon Lord", "kind": "title", "gender": "M"}}"#,
    )?;

    let glossary = store.load_glossary("frost")?;

    assert_eq!(glossary.get("アカリ"), Some(&TermEntry::simple("Akari")));
    let detailed = glossary.get("魔王").unwrap();
    assert_eq!(detailed.target, "Demon Lord");
    assert_eq!(detailed.annotation().as_deref(), Some("title, M"));

    Ok(())
}

/// Test that a corrupt glossary file is an error, not silent data loss
#[test]
fn test_load_glossary_withCorruptFile_shouldReturnMalformedError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    store.ensure_novel("frost")?;
    let terms_path = store.novel_dir("frost").join("glossary").join("terms.json");
    fs::write(&terms_path, "{not json")?;

    let error = store.load_glossary("frost").unwrap_err();

    assert!(matches!(error, SessionError::Malformed { .. }));
    assert!(error.to_string().contains("terms.json"));

    Ok(())
}

/// Test that context memory accumulates blocks and reads back trimmed to
/// the configured budget, starting at a block boundary
#[test]
fn test_read_context_overBudget_shouldKeepNewestBlocks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.session.context_char_budget = 60;
    let store = open_store(&config)?;

    store.append_context("frost", "first chapter tail, long enough to overflow the budget")?;
    store.append_context("frost", "second chapter tail")?;
    store.append_context("frost", "third chapter tail")?;

    let context = store.read_context("frost")?;

    assert!(!context.contains("first chapter"));
    assert!(context.contains("second chapter tail"));
    assert!(context.ends_with("third chapter tail"));
    assert!(context.chars().count() <= 60);

    Ok(())
}

/// Test that context under the budget reads back whole
#[test]
fn test_read_context_underBudget_shouldReturnEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    store.append_context("frost", "only block")?;

    assert_eq!(store.read_context("frost")?, "only block");

    Ok(())
}

/// Test that suggestions accumulate without duplicates
#[test]
fn test_append_suggestions_withDuplicates_shouldRecordEachOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    let added = store.append_suggestions("frost", &["Akari".to_string(), "Zeke".to_string()])?;
    assert_eq!(added, 2);

    let added = store.append_suggestions("frost", &["Zeke".to_string(), "Mio".to_string()])?;
    assert_eq!(added, 1);

    let suggestions = store.load_suggestions("frost")?;
    assert_eq!(suggestions, vec!["Akari", "Zeke", "Mio"]);

    Ok(())
}

/// Test that different novels keep fully separate state
#[test]
fn test_sessionStore_withTwoNovels_shouldIsolateState() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let store = open_store(&config)?;

    let mut terms = Glossary::new();
    terms.insert("Akari", "Akari");
    store.append_terms("frost", &terms)?;
    store.append_context("gale", "a different story")?;

    assert!(store.load_glossary("gale")?.is_empty());
    assert_eq!(store.read_context("frost")?, "");
    assert_eq!(store.read_context("gale")?, "a different story");

    Ok(())
}
