/*!
 * Error and warning types for the chapter extractor.
 *
 * Fatal conditions are `ExtractError` values and abort the run before any
 * output is written. Non-fatal conditions are `ExtractWarning` values that
 * accumulate alongside the extracted document.
 */

use std::fmt;

use thiserror::Error;

/// Errors that abort an extraction run
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Malformed or missing configuration fields
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested chapter key matches no configured chapter
    #[error("Unknown chapter '{key}'. Available ids: {available}")]
    ChapterNotFound {
        /// Chapter id or start label that was requested
        key: String,
        /// Comma separated list of configured ids
        available: String,
    },

    /// A chapter references a label absent from the script
    #[error("Label '*{label}' not found in script")]
    LabelNotFound {
        /// Label name without the leading sigil
        label: String,
    },

    /// The start label does not precede the end label
    #[error("Invalid range: start label '*{start_label}' (line {start}) does not precede end label '*{end_label}' (line {end})")]
    InvalidRange {
        start_label: String,
        start: usize,
        end_label: String,
        end: usize,
    },

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),
}

impl From<std::io::Error> for ExtractError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Non-fatal conditions surfaced during extraction.
///
/// Line numbers are 1-based positions in the full script, so they can be
/// looked up directly in an editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// A dialogue line's character id is not in the roster
    #[error("line {line}: speaker id '{id}' is not in the roster")]
    UnresolvedSpeaker { id: String, line: usize },

    /// An embedded control tag outside the known vocabulary was stripped
    #[error("line {line}: stripped unrecognized tag '{tag}'")]
    UnrecognizedTag { tag: String, line: usize },

    /// A label was declared more than once; the first declaration wins
    #[error("line {line}: duplicate label '*{name}' ignored (first declared on line {first})")]
    DuplicateLabel { name: String, first: usize, line: usize },
}

impl ExtractWarning {
    /// Short category name used when summarising warnings
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::UnresolvedSpeaker { .. } => WarningKind::UnresolvedSpeaker,
            Self::UnrecognizedTag { .. } => WarningKind::UnrecognizedTag,
            Self::DuplicateLabel { .. } => WarningKind::DuplicateLabel,
        }
    }
}

/// Warning categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningKind {
    UnresolvedSpeaker,
    UnrecognizedTag,
    DuplicateLabel,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnresolvedSpeaker => "unresolved speaker",
            Self::UnrecognizedTag => "unrecognized tag",
            Self::DuplicateLabel => "duplicate label",
        };
        write!(f, "{}", name)
    }
}
