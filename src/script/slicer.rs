use crate::errors::ExtractError;

use super::ScriptFile;
use super::labels::LabelIndex;

/// A half-open range of script lines between two labels
#[derive(Debug, Clone, Copy)]
pub struct ChapterSlice<'a> {
    lines: &'a [String],
    start: usize,
}

impl<'a> ChapterSlice<'a> {
    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    /// 0-based script line index of the first sliced line
    pub fn start(&self) -> usize {
        self.start
    }

    /// 0-based script line index one past the last sliced line
    pub fn end(&self) -> usize {
        self.start + self.lines.len()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines paired with their 1-based script line numbers
    pub fn numbered(self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let start = self.start;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (start + i + 1, line.as_str()))
    }
}

/// Extract the lines `[offset(start_label), offset(end_label))`.
///
/// The end label's own line is never included, so chapters configured back
/// to back share no lines and leave no gaps.
pub fn slice<'a>(
    script: &'a ScriptFile,
    index: &LabelIndex,
    start_label: &str,
    end_label: &str,
) -> Result<ChapterSlice<'a>, ExtractError> {
    let start = index.offset_of(start_label)?;
    let end = index.offset_of(end_label)?;

    if start >= end {
        return Err(ExtractError::InvalidRange {
            start_label: start_label.to_string(),
            start: start + 1,
            end_label: end_label.to_string(),
            end: end + 1,
        });
    }

    Ok(ChapterSlice {
        lines: &script.lines()[start..end],
        start,
    })
}
