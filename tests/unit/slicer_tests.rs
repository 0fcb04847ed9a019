/*!
 * Tests for chapter range slicing
 */

use chapter_extractor::errors::ExtractError;
use chapter_extractor::script::{slicer, LabelIndex, ScriptFile};

use crate::common;

/// Test that the slice starts at the start label and stops before the end label
#[test]
fn test_slice_withValidLabels_shouldReturnHalfOpenRange() {
    let script = ScriptFile::from_text(common::SAMPLE_SCRIPT);
    let index = LabelIndex::build(script.lines());

    let slice = slicer::slice(&script, &index, "ch1_start", "ch1_end").unwrap();

    assert_eq!(slice.start(), 3);
    assert_eq!(slice.end(), 11);
    assert_eq!(slice.len(), 8);
    assert_eq!(slice.lines()[0], "*ch1_start");
    assert!(slice.lines().iter().all(|l| l != "*ch1_end"));
}

/// Test that consecutive chapters share no lines and leave no gap
#[test]
fn test_slice_withAdjacentChapters_shouldNotOverlap() {
    let script = ScriptFile::from_text(common::SAMPLE_SCRIPT);
    let index = LabelIndex::build(script.lines());

    let first = slicer::slice(&script, &index, "ch1_start", "ch1_end").unwrap();
    let second = slicer::slice(&script, &index, "ch1_end", "ch2_end").unwrap();

    assert_eq!(first.end(), second.start());
    assert_eq!(second.lines()[0], "*ch1_end");
}

/// Test that numbered lines carry 1-based script positions
#[test]
fn test_numbered_withSlice_shouldYieldOneBasedLineNumbers() {
    let script = ScriptFile::from_text("*a\nfirst\nsecond\n*b\n");
    let index = LabelIndex::build(script.lines());
    let slice = slicer::slice(&script, &index, "a", "b").unwrap();

    let numbered: Vec<(usize, &str)> = slice.numbered().collect();
    assert_eq!(numbered, vec![(1, "*a"), (2, "first"), (3, "second")]);
}

/// Test that a missing end label is reported by name
#[test]
fn test_slice_withMissingEndLabel_shouldReturnLabelNotFound() {
    let script = ScriptFile::from_text(common::SAMPLE_SCRIPT);
    let index = LabelIndex::build(script.lines());

    match slicer::slice(&script, &index, "ch1_start", "ch9_end") {
        Err(ExtractError::LabelNotFound { label }) => assert_eq!(label, "ch9_end"),
        other => panic!("expected LabelNotFound, got {:?}", other),
    }
}

/// Test that reversed or equal labels are rejected
#[test]
fn test_slice_withStartAfterEnd_shouldReturnInvalidRange() {
    let script = ScriptFile::from_text(common::SAMPLE_SCRIPT);
    let index = LabelIndex::build(script.lines());

    match slicer::slice(&script, &index, "ch1_end", "ch1_start") {
        Err(ExtractError::InvalidRange { start, end, .. }) => {
            assert_eq!(start, 12);
            assert_eq!(end, 4);
        }
        other => panic!("expected InvalidRange, got {:?}", other),
    }

    assert!(matches!(
        slicer::slice(&script, &index, "ch1_start", "ch1_start"),
        Err(ExtractError::InvalidRange { .. })
    ));
}

/// Test that CRLF line endings split the same way as LF
#[test]
fn test_from_text_withCrlfLineEndings_shouldMatchLf() {
    let lf = ScriptFile::from_text("*a\nline\n*b\n");
    let crlf = ScriptFile::from_text("*a\r\nline\r\n*b\r\n");

    assert_eq!(lf.lines(), crlf.lines());
    assert_eq!(crlf.len(), 3);
}
