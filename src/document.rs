/*!
 * Chapter document model and assembly.
 *
 * The document is the only artifact handed to downstream EPUB/Markdown
 * tooling, so its JSON shape is part of the public interface:
 *
 * ```json
 * {
 *   "chapter": {"id": "...", "title": "...", "episode": "...",
 *               "start_label": "...", "end_label": "..."},
 *   "entries": [{"type": "narration", "text": "..."},
 *               {"type": "dialogue", "text": "...", "speaker_id": "5",
 *                "speaker": "Bea", "portrait": "bea.png"},
 *               {"type": "music", "command": "bgm", "raw": "bgm \"...\""}],
 *   "speakers": {"5": {"name": "Bea", "portrait": "bea.png"}}
 * }
 * ```
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_config::{ChapterSpec, SpeakerInfo};
use crate::errors::{ExtractError, ExtractWarning};
use crate::file_utils::FileManager;
use crate::script::{ClassifiedLine, LineClass};
use crate::speakers::SpeakerResolver;

/// One item of the chapter transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Narration {
        text: String,
    },
    Dialogue {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        portrait: Option<String>,
    },
    Music {
        command: String,
        raw: String,
    },
}

impl Entry {
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Entry::Dialogue { .. })
    }

    /// Text of narration and dialogue entries
    pub fn text(&self) -> Option<&str> {
        match self {
            Entry::Narration { text } | Entry::Dialogue { text, .. } => Some(text.as_str()),
            Entry::Music { .. } => None,
        }
    }
}

/// Chapter metadata copied from the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMeta {
    pub id: String,
    pub title: String,
    pub episode: String,
    pub start_label: String,
    pub end_label: String,
}

impl From<&ChapterSpec> for ChapterMeta {
    fn from(spec: &ChapterSpec) -> Self {
        Self {
            id: spec.id.clone(),
            title: spec.title.clone(),
            episode: spec.episode.clone(),
            start_label: spec.start_label.clone(),
            end_label: spec.end_label.clone(),
        }
    }
}

/// Structured transcript of one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDocument {
    pub chapter: ChapterMeta,
    pub entries: Vec<Entry>,
    pub speakers: BTreeMap<String, SpeakerInfo>,
}

impl ChapterDocument {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ExtractError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExtractError::File(format!("Failed to serialize chapter document: {}", e)))
    }

    /// Write `{id}.json` into `output_dir`, creating the directory if needed.
    ///
    /// The JSON goes to a temporary file in the same directory first and is
    /// renamed into place, so a failed run never leaves a partial document.
    pub fn write_to<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf, ExtractError> {
        let json = self.to_json()?;
        let destination = FileManager::generate_output_path(output_dir, &self.chapter.id, "json");

        FileManager::write_atomic(&destination, &json)
            .map_err(|e| ExtractError::File(format!("{:#}", e)))?;

        Ok(destination)
    }

    pub fn count_dialogue(&self) -> usize {
        self.entries.iter().filter(|e| e.is_dialogue()).count()
    }
}

/// Folds classified lines into a chapter document
pub struct DocumentAssembler<'r> {
    chapter: ChapterMeta,
    entries: Vec<Entry>,
    resolver: SpeakerResolver<'r>,
    warnings: Vec<ExtractWarning>,
}

impl<'r> DocumentAssembler<'r> {
    pub fn new(chapter: &ChapterSpec, roster: &'r BTreeMap<String, SpeakerInfo>) -> Self {
        Self {
            chapter: ChapterMeta::from(chapter),
            entries: Vec::new(),
            resolver: SpeakerResolver::new(roster),
            warnings: Vec::new(),
        }
    }

    /// Append one classified line; discards are ignored
    pub fn push(&mut self, line: ClassifiedLine) {
        let entry = match line.class {
            LineClass::Narration { text } => Entry::Narration { text },
            LineClass::Music { command, raw } => Entry::Music { command, raw },
            LineClass::Dialogue { text, speaker_id } => {
                let info = match &speaker_id {
                    Some(id) => {
                        let info = self.resolver.resolve(id);
                        if info.is_none() {
                            self.warnings.push(ExtractWarning::UnresolvedSpeaker {
                                id: id.clone(),
                                line: line.line,
                            });
                        }
                        info
                    }
                    None => None,
                };

                Entry::Dialogue {
                    text,
                    speaker_id,
                    speaker: info.and_then(|i| i.name.clone()),
                    portrait: info.and_then(|i| i.portrait.clone()),
                }
            }
            LineClass::Discard => return,
        };

        self.entries.push(entry);
    }

    pub fn extend<I: IntoIterator<Item = ClassifiedLine>>(&mut self, lines: I) {
        for line in lines {
            self.push(line);
        }
    }

    /// Ids looked up but missing from the roster, with counts
    pub fn unresolved_speakers(&self) -> &BTreeMap<String, usize> {
        self.resolver.unresolved()
    }

    /// Finish the document; speakers are trimmed to those referenced
    pub fn finish(self) -> (ChapterDocument, Vec<ExtractWarning>) {
        let document = ChapterDocument {
            chapter: self.chapter,
            entries: self.entries,
            speakers: self.resolver.referenced(),
        };
        (document, self.warnings)
    }
}
