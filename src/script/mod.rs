/*!
 * Scenario script parsing.
 *
 * This module owns the in-memory script and the single-pass machinery that
 * turns a label range into classified lines:
 * - `labels`: label declaration index
 * - `slicer`: half-open line ranges between two labels
 * - `cleaner`: control-code stripping for localized text
 * - `classifier`: narration / dialogue / music / discard decisions
 */

use std::path::Path;

use log::debug;

use crate::errors::ExtractError;
use crate::file_utils::FileManager;

pub mod classifier;
pub mod cleaner;
pub mod labels;
pub mod slicer;

pub use classifier::{Classification, ClassifiedLine, LineClass, LineClassifier, SpeakerContext};
pub use cleaner::{CleanedText, TagRule, TagVocabulary, TextCleaner};
pub use labels::{Label, LabelIndex};
pub use slicer::ChapterSlice;

/// The full scenario text as an ordered sequence of lines
#[derive(Debug, Clone, Default)]
pub struct ScriptFile {
    lines: Vec<String>,
}

impl ScriptFile {
    /// Split script text into lines, accepting both `\n` and `\r\n`
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Decode raw bytes as UTF-8, replacing invalid sequences
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(bytes))
    }

    /// Read a script from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(ExtractError::File(format!(
                "Script file not found: {}",
                path.display()
            )));
        }

        let bytes = FileManager::read_bytes(path)
            .map_err(|e| ExtractError::File(format!("{:#}", e)))?;
        let script = Self::from_bytes(&bytes);
        debug!("Loaded {} lines from {}", script.len(), path.display());
        Ok(script)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
