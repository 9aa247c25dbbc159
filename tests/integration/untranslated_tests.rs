/*!
 * Tests for listing entries that still lack a translation
 */

use anyhow::Result;
use lexparity::corpus::{find_untranslated, CorpusLayout, DigitFilter};
use crate::common::{self, TestCorpus};

/// Test that missing entries are listed in numeric order
#[test]
fn test_findUntranslated_withPartialCorpus_shouldListMissingInOrder() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB10", "<p>x</p>", None)?;
    corpus.add("BDB9", "<p>x</p>", None)?;
    corpus.add("BDB100", "<p>x</p>", Some("<p>x</p>"))?;
    corpus.add("BDB2", "<p>x</p>", None)?;
    common::create_test_file(&corpus.layout.source_dir, "style.css", "p {}")?;

    let report = find_untranslated(&corpus.layout, &DigitFilter::all())?;

    let missing: Vec<&str> = report.missing.iter().map(|p| p.entry.as_str()).collect();
    assert_eq!(missing, vec!["BDB2", "BDB9", "BDB10"]);
    assert_eq!(report.total, 4);
    assert_eq!(report.translated(), 1);

    Ok(())
}

/// Test that the digit filter splits the corpus without overlap
#[test]
fn test_findUntranslated_withDigitFilters_shouldPartitionEntries() -> Result<()> {
    let corpus = TestCorpus::new()?;
    for n in 1..=25 {
        corpus.add(&format!("BDB{}", n), "<p>x</p>", None)?;
    }

    let mut seen = 0;
    for digit in 0..10u8 {
        let report = find_untranslated(&corpus.layout, &DigitFilter::from_digits([digit])?)?;
        assert!(report.missing.iter().all(|p| p.number().is_some_and(|n| n % 10 == digit as u64)));
        seen += report.missing.len();
    }
    assert_eq!(seen, 25);

    Ok(())
}

/// Test that a missing target directory means nothing is translated
#[test]
fn test_findUntranslated_withNoTargetDir_shouldListEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source_dir = temp_dir.path().join("Entries");
    common::create_test_file(&source_dir, "BDB1.html", "<p>x</p>")?;
    let layout = CorpusLayout::new(&source_dir, temp_dir.path().join("absent"), "html");

    let report = find_untranslated(&layout, &DigitFilter::all())?;

    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.translated(), 0);
    Ok(())
}

/// Test that entries lacking their plain-text translation are counted as awaiting text
#[test]
fn test_findUntranslated_withTextDir_shouldCountAwaitingText() -> Result<()> {
    let corpus = TestCorpus::new()?.with_text_dir()?;
    corpus.add("BDB1", "<p>x</p>", Some("<p>x</p>"))?;
    corpus.add("BDB2", "<p>x</p>", None)?;
    corpus.add("BDB3", "<p>x</p>", None)?;
    corpus.add_text("BDB3", "texte")?;

    let report = find_untranslated(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(report.missing.len(), 2);
    assert_eq!(report.awaiting_text(), 1);
    assert!(report.missing[0].awaits_text());
    assert!(!report.missing[1].awaits_text());

    let plain = find_untranslated(&TestCorpus::new()?.layout, &DigitFilter::all())?;
    assert_eq!(plain.awaiting_text(), 0);
    Ok(())
}

/// Test that a target tree nested in the source tree is not listed as sources
#[test]
fn test_sourceEntries_withNestedTargetDir_shouldSkipTargets() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source_dir = temp_dir.path().join("Entries");
    let target_dir = source_dir.join("fr");
    common::create_test_file(&source_dir, "BDB1.html", "<p>x</p>")?;
    common::create_test_file(&target_dir, "BDB1.html", "<p>x</p>")?;
    let layout = CorpusLayout::new(&source_dir, &target_dir, "html");

    let entries = layout.source_entries(&DigitFilter::all())?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, source_dir.join("BDB1.html"));
    assert!(entries[0].has_target());
    Ok(())
}
