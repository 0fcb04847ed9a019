use std::collections::HashMap;

use crate::errors::{ExtractError, ExtractWarning};

/// Sigil that opens a label declaration line
pub const LABEL_SIGIL: char = '*';

/// A label declaration: name without the sigil, 0-based line index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub line: usize,
}

/// Index of every label declared in a script.
///
/// Built in one linear pass. Lookups are case-sensitive exact matches. When a
/// name is declared more than once the first declaration wins and the later
/// ones are kept in `duplicates` for reporting.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    offsets: HashMap<String, usize>,
    duplicates: Vec<Label>,
}

/// Parse a label name out of a declaration line
pub fn parse_label(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(LABEL_SIGIL)?;
    let name = rest
        .split(|c: char| c.is_whitespace() || c == ';')
        .next()
        .unwrap_or_default();

    if name.is_empty() { None } else { Some(name) }
}

impl LabelIndex {
    pub fn build<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut index = Self::default();

        for (line_index, line) in lines.iter().enumerate() {
            let Some(name) = parse_label(line.as_ref()) else {
                continue;
            };

            if index.offsets.contains_key(name) {
                index.duplicates.push(Label {
                    name: name.to_string(),
                    line: line_index,
                });
            } else {
                index.offsets.insert(name.to_string(), line_index);
            }
        }

        index
    }

    /// Line index of a label declaration
    pub fn offset_of(&self, name: &str) -> Result<usize, ExtractError> {
        self.offsets
            .get(name)
            .copied()
            .ok_or_else(|| ExtractError::LabelNotFound {
                label: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.offsets.contains_key(name)
    }

    /// Later declarations of names that were already indexed
    pub fn duplicates(&self) -> &[Label] {
        &self.duplicates
    }

    /// Warnings for the ignored duplicates of the given names
    pub fn duplicate_warnings(&self, names: &[&str]) -> Vec<ExtractWarning> {
        self.duplicates
            .iter()
            .filter(|dup| names.contains(&dup.name.as_str()))
            .filter_map(|dup| {
                let first = *self.offsets.get(&dup.name)?;
                Some(ExtractWarning::DuplicateLabel {
                    name: dup.name.clone(),
                    first: first + 1,
                    line: dup.line + 1,
                })
            })
            .collect()
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
