/*!
 * End-to-end tests for corpus runs over temporary directories
 */

use std::fs;
use anyhow::Result;
use lexparity::corpus::{write_report, CleanCache, CorpusRunner, DigitFilter, PairOutcome};
use lexparity::errors::Side;
use lexparity::parity::{DiscrepancyKind, ParityChecker, ParityConfig};
use crate::common::{self, TestCorpus};

fn runner() -> CorpusRunner {
    CorpusRunner::new(ParityChecker::default())
}

fn entries(outcomes: &[PairOutcome]) -> Vec<&str> {
    outcomes.iter().map(|o| o.entry()).collect()
}

/// Test that a faithful corpus is clean and reports every pair
#[test]
fn test_run_withFaithfulCorpus_shouldBeAllClean() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB17", common::sample_source_entry(), Some(common::sample_target_entry()))?;
    corpus.add("BDB2", "<p><bdbheb>בַּ</bdbheb> in</p>", Some("<p><bdbheb>בַּ</bdbheb> dans</p>"))?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(entries(&run.outcomes), vec!["BDB2", "BDB17"]);
    assert!(run.outcomes.iter().all(PairOutcome::is_clean));
    assert_eq!(run.summary.clean, 2);
    assert!(!run.summary.has_failures());

    Ok(())
}

/// Test that every pair ends in exactly one outcome and none are dropped
#[test]
fn test_run_withMixedCorpus_shouldClassifyEachPair() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB1", "<p><bdbheb>א</bdbheb> aleph</p>", Some("<p><bdbheb>א</bdbheb> aleph</p>"))?;
    corpus.add("BDB10", "<p><bdbheb>אָב</bdbheb> father</p>", Some("<p><bdbheb>אב</bdbheb> père</p>"))?;
    corpus.add("BDB3", "<p><lookup>x</lookup> text</p>", Some("<p><lookup>x</lookup> texte</b>"))?;
    corpus.add("BDB4", "<p>not yet</p>", None)?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(entries(&run.outcomes), vec!["BDB1", "BDB3", "BDB10"]);
    assert_eq!(run.summary.clean, 1);
    assert_eq!(run.summary.flagged, vec!["BDB10"]);
    assert_eq!(run.summary.unprocessable, vec!["BDB3"]);
    assert_eq!(run.summary.untranslated, 1);
    assert_eq!(run.summary.by_kind.get(&DiscrepancyKind::PayloadMismatch), Some(&1));
    assert!(run.summary.has_failures());

    match &run.outcomes[1] {
        PairOutcome::Unprocessable { side, reason, .. } => {
            assert_eq!(*side, Side::Target);
            assert!(reason.contains("</b>"));
        }
        other => panic!("expected unprocessable, got {:?}", other),
    }

    Ok(())
}

/// Test that invalid UTF-8 makes a pair unprocessable instead of failing the run
#[test]
fn test_run_withInvalidUtf8Target_shouldBeUnprocessable() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB5", "<p>x</p>", None)?;
    fs::write(corpus.layout.target_dir.join("BDB5.html"), [0x3c, 0x70, 0x3e, 0xff, 0xfe])?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(run.summary.unprocessable, vec!["BDB5"]);
    Ok(())
}

/// Test that the digit filter restricts the run
#[test]
fn test_run_withDigitFilter_shouldOnlyCheckMatchingEntries() -> Result<()> {
    let corpus = TestCorpus::new()?;
    for entry in ["BDB1", "BDB2", "BDB11", "BDB21"] {
        corpus.add(entry, "<p>same</p>", Some("<p>same</p>"))?;
    }

    let run = runner().run(&corpus.layout, &DigitFilter::from_digits([1])?)?;

    assert_eq!(entries(&run.outcomes), vec!["BDB1", "BDB11", "BDB21"]);
    Ok(())
}

/// Test that clean pairs are cached and edits invalidate them
#[test]
fn test_run_withCleanCache_shouldSkipUnchangedPairs() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB1", "<p><bdbheb>א</bdbheb> one</p>", Some("<p><bdbheb>א</bdbheb> une</p>"))?;
    corpus.add("BDB2", "<p><bdbheb>ב</bdbheb> two</p>", Some("<p><bdbheb>ב</bdbheb> deux</p>"))?;
    let cache_path = corpus.path("clean.txt");
    let fingerprint = ParityConfig::default().fingerprint();

    let mut first = runner().with_cache(CleanCache::load(&cache_path, &fingerprint)?);
    let run = first.run(&corpus.layout, &DigitFilter::all())?;
    assert_eq!(run.summary.cache_hits, 0);
    assert_eq!(fs::read_to_string(&cache_path)?.lines().count(), 2);

    let mut second = runner().with_cache(CleanCache::load(&cache_path, &fingerprint)?);
    let run = second.run(&corpus.layout, &DigitFilter::all())?;
    assert_eq!(run.summary.cache_hits, 2);
    assert_eq!(run.summary.clean, 2);

    // Breaking a target must be noticed despite the cache
    corpus.add("BDB2", "<p><bdbheb>ב</bdbheb> two</p>", Some("<p><bdbheb>ג</bdbheb> deux</p>"))?;
    let mut third = runner().with_cache(CleanCache::load(&cache_path, &fingerprint)?);
    let run = third.run(&corpus.layout, &DigitFilter::all())?;
    assert_eq!(run.summary.cache_hits, 1);
    assert_eq!(run.summary.flagged, vec!["BDB2"]);

    // Different settings never reuse old entries
    let other = ParityConfig {
        flag_translate_drift: true,
        ..ParityConfig::default()
    };
    let mut fourth = runner().with_cache(CleanCache::load(&cache_path, &other.fingerprint())?);
    let run = fourth.run(&corpus.layout, &DigitFilter::all())?;
    assert_eq!(run.summary.cache_hits, 0);

    Ok(())
}

/// Test that the report has one JSON object per outcome
#[test]
fn test_writeReport_shouldWriteJsonLines() -> Result<()> {
    let corpus = TestCorpus::new()?;
    corpus.add("BDB1", "<p><lookup>a</lookup> text</p>", Some("<p> texte</p>"))?;
    corpus.add("BDB2", "<p>b</p>", Some("<p>b</p>"))?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;
    let report_path = corpus.path("out/report.jsonl");
    write_report(&report_path, &run.outcomes)?;

    let content = fs::read_to_string(&report_path)?;
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["entry"], "BDB1");
    assert_eq!(lines[0]["status"], "checked");
    assert_eq!(lines[0]["verdict"], "flagged");
    assert_eq!(lines[0]["discrepancies"][0]["kind"], "missing-token");
    assert_eq!(lines[1]["verdict"], "clean");

    Ok(())
}

/// Test that a missing source directory is an error, not an empty run
#[test]
fn test_run_withMissingSourceDir_shouldFail() -> Result<()> {
    let corpus = TestCorpus::new()?;
    fs::remove_dir_all(&corpus.layout.source_dir)?;

    assert!(runner().run(&corpus.layout, &DigitFilter::all()).is_err());
    Ok(())
}

/// Test that a target which lost part of its plain-text translation is flagged
#[test]
fn test_run_withTextDir_shouldFlagTextMissingFromTarget() -> Result<()> {
    let corpus = TestCorpus::new()?.with_text_dir()?;
    let source = "<p><bdbheb>אָב</bdbheb> father of a household</p><p>chief of a clan</p>";
    corpus.add("BDB1", source, Some("<p><bdbheb>אָב</bdbheb> père de la maisonnée et chef de clan</p>"))?;
    corpus.add_text("BDB1", "père de la maisonnée\nchef de clan")?;
    corpus.add("BDB2", source, Some("<p><bdbheb>אָב</bdbheb> père de la maisonnée, et encore du texte</p>"))?;
    corpus.add_text("BDB2", "père de la maisonnée\nchef de clan")?;
    corpus.add("BDB3", source, Some("<p><bdbheb>אָב</bdbheb> père de la maisonnée, chef de clan</p>"))?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(run.summary.clean, 2);
    assert_eq!(run.summary.flagged, vec!["BDB2"]);
    assert_eq!(run.summary.by_kind.get(&DiscrepancyKind::TextMissing), Some(&1));
    Ok(())
}

/// Test that an unreadable text file makes the pair unprocessable on the text side
#[test]
fn test_run_withInvalidUtf8Text_shouldBeUnprocessable() -> Result<()> {
    let corpus = TestCorpus::new()?.with_text_dir()?;
    corpus.add("BDB7", "<p>x</p>", Some("<p>x</p>"))?;
    fs::write(corpus.path("Entries_txt_fr").join("BDB7.txt"), [0xff, 0xfe])?;

    let run = runner().run(&corpus.layout, &DigitFilter::all())?;

    assert!(matches!(
        run.outcomes.as_slice(),
        [PairOutcome::Unprocessable { side: Side::Text, .. }]
    ));
    Ok(())
}

/// Test that editing the plain-text translation invalidates the cached verdict
#[test]
fn test_run_withEditedText_shouldRecheckCachedPair() -> Result<()> {
    let corpus = TestCorpus::new()?.with_text_dir()?;
    corpus.add("BDB1", "<p>father</p>", Some("<p>le père</p>"))?;
    corpus.add_text("BDB1", "le père")?;
    let cache_path = corpus.path("clean.cache");
    let fingerprint = ParityConfig::default().fingerprint();

    let first = runner()
        .with_cache(CleanCache::load(&cache_path, &fingerprint)?)
        .run(&corpus.layout, &DigitFilter::all())?;
    assert_eq!(first.summary.clean, 1);

    corpus.add_text("BDB1", "père et ancêtre")?;
    let second = runner()
        .with_cache(CleanCache::load(&cache_path, &fingerprint)?)
        .run(&corpus.layout, &DigitFilter::all())?;

    assert_eq!(second.summary.cache_hits, 0);
    assert_eq!(second.summary.flagged, vec!["BDB1"]);
    Ok(())
}
