/*!
 * Tests for error and warning types
 */

use chapter_extractor::errors::{ExtractError, ExtractWarning, WarningKind};

#[test]
fn test_extractError_labelNotFound_shouldDisplayLabelWithSigil() {
    let error = ExtractError::LabelNotFound {
        label: "umi1_1".to_string(),
    };
    assert_eq!(error.to_string(), "Label '*umi1_1' not found in script");
}

#[test]
fn test_extractError_chapterNotFound_shouldListAvailableIds() {
    let error = ExtractError::ChapterNotFound {
        key: "episode9".to_string(),
        available: "episode1-opening, episode1-day1".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("episode9"));
    assert!(display.contains("episode1-opening, episode1-day1"));
}

#[test]
fn test_extractError_invalidRange_shouldDisplayBothPositions() {
    let error = ExtractError::InvalidRange {
        start_label: "b".to_string(),
        start: 40,
        end_label: "a".to_string(),
        end: 12,
    };
    let display = error.to_string();
    assert!(display.contains("'*b' (line 40)"));
    assert!(display.contains("'*a' (line 12)"));
}

#[test]
fn test_extractError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: ExtractError = io_error.into();

    assert!(matches!(error, ExtractError::File(_)));
    assert!(error.to_string().contains("read-only"));
}

#[test]
fn test_extractError_config_shouldDisplayCorrectly() {
    let error = ExtractError::Config("No chapters configured".to_string());
    assert_eq!(error.to_string(), "Configuration error: No chapters configured");
}

#[test]
fn test_extractWarning_display_shouldIncludeLineNumbers() {
    let unresolved = ExtractWarning::UnresolvedSpeaker {
        id: "99".to_string(),
        line: 120,
    };
    assert_eq!(unresolved.to_string(), "line 120: speaker id '99' is not in the roster");

    let tag = ExtractWarning::UnrecognizedTag {
        tag: "~u~".to_string(),
        line: 7,
    };
    assert!(tag.to_string().contains("'~u~'"));

    let duplicate = ExtractWarning::DuplicateLabel {
        name: "umi1_1".to_string(),
        first: 10,
        line: 50,
    };
    let display = duplicate.to_string();
    assert!(display.contains("line 50"));
    assert!(display.contains("first declared on line 10"));
}

#[test]
fn test_extractWarning_kind_shouldMatchVariant() {
    let warnings = [
        ExtractWarning::UnresolvedSpeaker { id: "1".to_string(), line: 1 },
        ExtractWarning::UnrecognizedTag { tag: "!x".to_string(), line: 1 },
        ExtractWarning::DuplicateLabel { name: "a".to_string(), first: 1, line: 2 },
    ];
    let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind()).collect();

    assert_eq!(
        kinds,
        vec![
            WarningKind::UnresolvedSpeaker,
            WarningKind::UnrecognizedTag,
            WarningKind::DuplicateLabel,
        ]
    );
    assert_eq!(WarningKind::UnresolvedSpeaker.to_string(), "unresolved speaker");
}
