use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{ExtractionProfile, normalize_speaker_id};
use crate::errors::ExtractWarning;

use super::cleaner::TextCleaner;
use super::slicer::ChapterSlice;

/// `advchar "10"` selects the character whose name box is shown
static ADVCHAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^advchar\s+"?(-?[^"\s]+)"?"#).expect("Invalid advchar regex")
});

/// Classification of one script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Narration { text: String },
    Dialogue { text: String, speaker_id: Option<String> },
    Music { command: String, raw: String },
    Discard,
}

/// A kept line together with its 1-based script line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub line: usize,
    pub class: LineClass,
}

/// Speaker selected by the most recent `advchar` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerContext {
    active: Option<String>,
}

impl SpeakerContext {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set(&mut self, id: Option<String>) {
        self.active = id;
    }
}

/// Output of classifying a whole slice
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Kept lines in source order
    pub lines: Vec<ClassifiedLine>,
    /// Number of lines dropped as noise or other-locale text
    pub discarded: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Decides what each script line contributes to the chapter document
#[derive(Debug, Clone)]
pub struct LineClassifier {
    profile: ExtractionProfile,
    cleaner: TextCleaner,
}

impl LineClassifier {
    pub fn new(profile: ExtractionProfile) -> Self {
        let cleaner = TextCleaner::new(profile.tags.clone());
        Self { profile, cleaner }
    }

    /// Strip the locale marker from a target-locale line
    fn locale_body<'l>(&self, line: &'l str) -> Option<&'l str> {
        let marker = self.profile.locale_marker.as_str();
        let head = line.get(..marker.len())?;
        if !head.eq_ignore_ascii_case(marker) {
            return None;
        }

        let body = &line[marker.len()..];
        match body.chars().next() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
            _ => Some(body),
        }
    }

    /// Classify one raw line.
    ///
    /// `line` is the 1-based line number used in warnings. `advchar` lines
    /// update `context` and are discarded themselves.
    pub fn classify(
        &self,
        raw: &str,
        line: usize,
        context: &mut SpeakerContext,
        warnings: &mut Vec<ExtractWarning>,
    ) -> LineClass {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            return LineClass::Discard;
        }

        if let Some(caps) = ADVCHAR_REGEX.captures(trimmed) {
            let code = &caps[1];
            context.set(if code == "-1" {
                None
            } else {
                Some(normalize_speaker_id(code))
            });
            trace!("line {}: speaker context {:?}", line, context.active());
            return LineClass::Discard;
        }

        let keyword = trimmed.split_whitespace().next().unwrap_or_default();
        if self.profile.is_music_command(keyword) {
            return LineClass::Music {
                command: keyword.to_lowercase(),
                raw: trimmed.to_string(),
            };
        }

        let Some(body) = self.locale_body(trimmed) else {
            return LineClass::Discard;
        };

        let cleaned = self.cleaner.clean(body);
        warnings.extend(
            cleaned
                .unrecognized_tags
                .iter()
                .map(|tag| ExtractWarning::UnrecognizedTag {
                    tag: tag.clone(),
                    line,
                }),
        );

        if cleaned.text.is_empty() {
            return LineClass::Discard;
        }

        let has_voice = cleaned.has_voice();
        let speaker_id = cleaned
            .speaker_id
            .or_else(|| context.active().map(str::to_string));

        if has_voice || speaker_id.is_some() {
            LineClass::Dialogue {
                text: cleaned.text,
                speaker_id,
            }
        } else {
            LineClass::Narration { text: cleaned.text }
        }
    }

    /// Classify every line of a chapter slice, keeping source order
    pub fn classify_slice(&self, slice: ChapterSlice<'_>) -> Classification {
        let mut classification = Classification::default();
        let mut context = SpeakerContext::default();

        for (line, raw) in slice.numbered() {
            match self.classify(raw, line, &mut context, &mut classification.warnings) {
                LineClass::Discard => classification.discarded += 1,
                class => classification.lines.push(ClassifiedLine { line, class }),
            }
        }

        classification
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(ExtractionProfile::default())
    }
}
