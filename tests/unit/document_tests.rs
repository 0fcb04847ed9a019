/*!
 * Tests for the chapter document model and assembly
 */

use anyhow::Result;
use serde_json::Value;

use chapter_extractor::document::{ChapterDocument, DocumentAssembler, Entry};
use chapter_extractor::errors::ExtractWarning;
use chapter_extractor::script::{ClassifiedLine, LineClass};

use crate::common;

fn dialogue(line: usize, text: &str, speaker_id: Option<&str>) -> ClassifiedLine {
    ClassifiedLine {
        line,
        class: LineClass::Dialogue {
            text: text.to_string(),
            speaker_id: speaker_id.map(str::to_string),
        },
    }
}

fn narration(line: usize, text: &str) -> ClassifiedLine {
    ClassifiedLine {
        line,
        class: LineClass::Narration {
            text: text.to_string(),
        },
    }
}

fn assemble(lines: Vec<ClassifiedLine>) -> (ChapterDocument, Vec<ExtractWarning>) {
    let roster = common::sample_roster();
    let chapter = common::chapter("ch1", "ch1_start", "ch1_end");
    let mut assembler = DocumentAssembler::new(&chapter, &roster);
    assembler.extend(lines);
    assembler.finish()
}

/// Test that resolved speakers are attached and the roster is trimmed
#[test]
fn test_finish_withResolvedSpeaker_shouldTrimRoster() {
    let (document, warnings) = assemble(vec![
        narration(2, "The wind howled."),
        dialogue(3, "\"Welcome.\"", Some("5")),
        dialogue(4, "\"Again.\"", Some("5")),
    ]);

    assert!(warnings.is_empty());
    assert_eq!(document.entries.len(), 3);
    assert_eq!(document.count_dialogue(), 2);
    assert_eq!(
        document.entries[1],
        Entry::Dialogue {
            text: "\"Welcome.\"".to_string(),
            speaker_id: Some("5".to_string()),
            speaker: Some("Bea".to_string()),
            portrait: Some("bea.png".to_string()),
        }
    );
    assert_eq!(document.speakers.keys().collect::<Vec<_>>(), vec!["5"]);
}

/// Test that an unknown id keeps the text and raises a warning
#[test]
fn test_push_withUnknownSpeaker_shouldKeepEntryAndWarn() {
    let (document, warnings) = assemble(vec![dialogue(7, "\"Who am I?\"", Some("99"))]);

    assert_eq!(
        document.entries,
        vec![Entry::Dialogue {
            text: "\"Who am I?\"".to_string(),
            speaker_id: Some("99".to_string()),
            speaker: None,
            portrait: None,
        }]
    );
    assert!(document.speakers.is_empty());
    assert_eq!(
        warnings,
        vec![ExtractWarning::UnresolvedSpeaker {
            id: "99".to_string(),
            line: 7,
        }]
    );
}

/// Test that missing ids are counted per id
#[test]
fn test_unresolved_speakers_withRepeatedUnknownId_shouldCountLookups() {
    let roster = common::sample_roster();
    let chapter = common::chapter("ch1", "ch1_start", "ch1_end");
    let mut assembler = DocumentAssembler::new(&chapter, &roster);

    assembler.push(dialogue(1, "\"One.\"", Some("99")));
    assembler.push(dialogue(2, "\"Two.\"", Some("99")));
    assembler.push(dialogue(3, "\"Three.\"", Some("5")));

    assert_eq!(assembler.unresolved_speakers().get("99"), Some(&2));
    assert_eq!(assembler.unresolved_speakers().len(), 1);
}

/// Test that dialogue without an id is kept without a warning
#[test]
fn test_push_withAnonymousDialogue_shouldNotWarn() {
    let (document, warnings) = assemble(vec![dialogue(1, "\"...\"", None)]);

    assert!(document.entries[0].is_dialogue());
    assert!(warnings.is_empty());
}

/// Test that discards produce no entry
#[test]
fn test_push_withDiscard_shouldSkipLine() {
    let (document, _) = assemble(vec![
        ClassifiedLine {
            line: 1,
            class: LineClass::Discard,
        },
        narration(2, "Kept."),
    ]);

    assert_eq!(document.entries.len(), 1);
    assert_eq!(document.entries[0].text(), Some("Kept."));
}

/// Test the serialized JSON shape
#[test]
fn test_to_json_withAllEntryKinds_shouldUseTaggedShape() -> Result<()> {
    let (document, _) = assemble(vec![
        narration(1, "The wind howled."),
        dialogue(2, "\"Welcome.\"", Some("5")),
        dialogue(3, "\"Who?\"", Some("99")),
        ClassifiedLine {
            line: 4,
            class: LineClass::Music {
                command: "bgm_play".to_string(),
                raw: "bgm_play foo".to_string(),
            },
        },
    ]);

    let json: Value = serde_json::from_str(&document.to_json()?)?;

    assert_eq!(json["chapter"]["id"], "ch1");
    assert_eq!(json["chapter"]["start_label"], "ch1_start");
    assert_eq!(json["chapter"]["end_label"], "ch1_end");

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries[0], serde_json::json!({"type": "narration", "text": "The wind howled."}));
    assert_eq!(
        entries[1],
        serde_json::json!({
            "type": "dialogue",
            "text": "\"Welcome.\"",
            "speaker_id": "5",
            "speaker": "Bea",
            "portrait": "bea.png"
        })
    );
    assert!(entries[2].get("speaker").is_none());
    assert!(entries[2].get("portrait").is_none());
    assert_eq!(
        entries[3],
        serde_json::json!({"type": "music", "command": "bgm_play", "raw": "bgm_play foo"})
    );

    assert_eq!(
        json["speakers"],
        serde_json::json!({"5": {"name": "Bea", "portrait": "bea.png"}})
    );

    // The document reads back unchanged
    let parsed: ChapterDocument = serde_json::from_str(&document.to_json()?)?;
    assert_eq!(parsed, document);

    Ok(())
}

/// Test that write_to creates the directory and names the file after the chapter id
#[test]
fn test_write_to_withMissingDirectory_shouldCreateIdJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("build").join("epub");
    let (document, _) = assemble(vec![narration(1, "Hello.")]);

    let path = document.write_to(&output_dir)?;

    assert_eq!(path, output_dir.join("ch1.json"));
    let written: ChapterDocument = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written, document);

    // Only the document itself is left behind
    assert_eq!(std::fs::read_dir(&output_dir)?.count(), 1);

    Ok(())
}
