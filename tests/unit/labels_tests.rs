/*!
 * Tests for the label declaration index
 */

use chapter_extractor::errors::{ExtractError, ExtractWarning};
use chapter_extractor::script::LabelIndex;

use crate::common;

fn sample_lines() -> Vec<String> {
    common::SAMPLE_SCRIPT.lines().map(str::to_string).collect()
}

/// Test that every declaration gets its 0-based line index
#[test]
fn test_build_withSampleScript_shouldIndexEveryLabel() {
    let index = LabelIndex::build(&sample_lines());

    assert_eq!(index.len(), 4);
    assert_eq!(index.offset_of("define").unwrap(), 1);
    assert_eq!(index.offset_of("ch1_start").unwrap(), 3);
    assert_eq!(index.offset_of("ch1_end").unwrap(), 11);
    assert_eq!(index.offset_of("ch2_end").unwrap(), 13);
    assert!(index.duplicates().is_empty());
}

/// Test that lookups are exact and case-sensitive
#[test]
fn test_offset_of_withWrongCase_shouldReturnLabelNotFound() {
    let index = LabelIndex::build(&sample_lines());

    assert!(index.contains("ch1_start"));
    assert!(!index.contains("CH1_START"));

    match index.offset_of("CH1_START") {
        Err(ExtractError::LabelNotFound { label }) => assert_eq!(label, "CH1_START"),
        other => panic!("expected LabelNotFound, got {:?}", other),
    }
}

/// Test that text lines containing an asterisk are not labels
#[test]
fn test_build_withAsteriskInsideText_shouldIgnoreLine() {
    let lines = vec![
        "langen^She whispered *softly*.^",
        "  *indented_label ; comment",
        "*",
    ];
    let index = LabelIndex::build(&lines);

    assert_eq!(index.len(), 1);
    assert_eq!(index.offset_of("indented_label").unwrap(), 1);
}

/// Test that the first declaration wins and later ones are recorded
#[test]
fn test_build_withDuplicateLabel_shouldKeepFirstDeclaration() {
    let lines = vec!["*a", "text", "*b", "*a", "*c"];
    let index = LabelIndex::build(&lines);

    assert_eq!(index.offset_of("a").unwrap(), 0);
    assert_eq!(index.duplicates().len(), 1);
    assert_eq!(index.duplicates()[0].name, "a");
    assert_eq!(index.duplicates()[0].line, 3);
}

/// Test that duplicate warnings are limited to the requested names and use 1-based lines
#[test]
fn test_duplicate_warnings_withRequestedNames_shouldReportOneBasedLines() {
    let lines = vec!["*a", "*b", "*a", "*b", "*c"];
    let index = LabelIndex::build(&lines);

    let warnings = index.duplicate_warnings(&["a", "c"]);
    assert_eq!(
        warnings,
        vec![ExtractWarning::DuplicateLabel {
            name: "a".to_string(),
            first: 1,
            line: 3,
        }]
    );

    assert_eq!(index.duplicate_warnings(&["b"]).len(), 1);
    assert!(index.duplicate_warnings(&["c"]).is_empty());
}

/// Test that an empty script has no labels
#[test]
fn test_build_withEmptyScript_shouldBeEmpty() {
    let index = LabelIndex::build::<&str>(&[]);
    assert!(index.is_empty());
    assert!(index.offset_of("anything").is_err());
}
