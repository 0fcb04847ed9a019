use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ExtractError;
use crate::language_utils;
use crate::script::cleaner::TagVocabulary;

/// Application configuration module
/// This module handles the chapter plan document: the chapters to export,
/// the speaker roster, and the extraction profile settings.
/// Represents the chapter plan configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Location of the master scenario file
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Target locale code (ISO) or engine locale marker
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Replaces the default music allow-list when present
    #[serde(default)]
    pub music_commands: Option<Vec<String>>,

    /// Extends the music allow-list
    #[serde(default)]
    pub extra_music_commands: Vec<String>,

    /// Additional inline tags to strip silently
    #[serde(default)]
    pub extra_tags: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Chapters available for export
    pub chapters: Vec<ChapterSpec>,

    /// Character roster keyed by character id
    #[serde(default)]
    pub speakers: BTreeMap<String, SpeakerInfo>,
}

/// Configuration for a single chapter export
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChapterSpec {
    /// Output key, also used as the output file stem
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub episode: String,

    /// First label of the chapter (inclusive)
    pub start_label: String,

    /// Label that starts the next chapter (exclusive)
    pub end_label: String,
}

/// Display metadata for a character that might speak in the script
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SpeakerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Explicit settings for one extraction pass.
///
/// Everything the classifier and cleaner need is carried here rather than in
/// module constants, so several profiles (different locales, different cue
/// sets) can be used side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionProfile {
    /// Marker that prefixes target-locale text lines, e.g. `langen`
    pub locale_marker: String,

    /// Lowercased command keywords kept as music cues
    pub music_commands: Vec<String>,

    /// Inline tags stripped from text
    pub tags: TagVocabulary,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self {
            locale_marker: "langen".to_string(),
            music_commands: default_music_commands(),
            tags: TagVocabulary::default(),
        }
    }
}

impl ExtractionProfile {
    /// Build a profile for the given locale with default cues and tags
    pub fn for_locale(locale: &str) -> Result<Self, ExtractError> {
        let locale_marker = language_utils::locale_marker(locale)
            .map_err(|e| ExtractError::Config(format!("Invalid locale '{}': {}", locale, e)))?;

        Ok(Self {
            locale_marker,
            ..Self::default()
        })
    }

    /// Replace the music allow-list
    pub fn with_music_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.music_commands.clear();
        self.add_music_commands(commands);
        self
    }

    /// Extend the music allow-list, ignoring duplicates
    pub fn add_music_commands<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for command in commands {
            let command = command.as_ref().trim().to_lowercase();
            if !command.is_empty() && !self.music_commands.contains(&command) {
                self.music_commands.push(command);
            }
        }
    }

    /// Apply allow-list overrides: `replace` swaps the whole list first,
    /// then `extra` is appended.
    pub fn with_overrides(mut self, replace: Option<&[String]>, extra: &[String]) -> Self {
        if let Some(commands) = replace {
            self = self.with_music_commands(commands);
        }
        self.add_music_commands(extra);
        self
    }

    /// Whether a command keyword is on the music allow-list
    pub fn is_music_command(&self, keyword: &str) -> bool {
        self.music_commands
            .iter()
            .any(|c| c.eq_ignore_ascii_case(keyword))
    }
}

/// Music and cut-in commands kept by default
pub fn default_music_commands() -> Vec<String> {
    ["bgm", "bgmplay", "bgm_play", "bgmstop", "bgmfade", "meplay", "meplay2"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_script_path() -> PathBuf {
    PathBuf::from("InDevelopment/ManualUpdates/0.utf")
}

fn default_locale() -> String {
    "en".to_string()
}

/// Strip a leading label sigil written into the configuration
fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    trimmed.strip_prefix('*').unwrap_or(trimmed).to_string()
}

/// Normalize a character id so `"05"` and `"5"` name the same speaker
pub fn normalize_speaker_id(id: &str) -> String {
    let trimmed = id.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

impl Config {
    /// Load a chapter plan from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ExtractError::Config(format!("Failed to open config file {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ExtractError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validated()
    }

    /// Parse a chapter plan from a JSON string and validate it
    pub fn from_json_str(content: &str) -> Result<Self, ExtractError> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| ExtractError::Config(format!("Failed to parse config: {}", e)))?;
        config.validated()
    }

    /// Validate, then normalize labels and speaker ids
    pub fn validated(mut self) -> Result<Self, ExtractError> {
        self.validate()?;

        for chapter in &mut self.chapters {
            chapter.start_label = normalize_label(&chapter.start_label);
            chapter.end_label = normalize_label(&chapter.end_label);
        }

        let speakers = std::mem::take(&mut self.speakers);
        for (id, info) in speakers {
            let normalized = normalize_speaker_id(&id);
            if self.speakers.contains_key(&normalized) {
                return Err(ExtractError::Config(format!(
                    "Speaker id '{}' collides with another roster entry after normalization",
                    id
                )));
            }
            self.speakers.insert(normalized, info);
        }

        debug!(
            "Loaded {} chapters and {} speakers",
            self.chapters.len(),
            self.speakers.len()
        );
        Ok(self)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.chapters.is_empty() {
            return Err(ExtractError::Config("No chapters configured".to_string()));
        }

        let mut seen = HashSet::new();
        for (position, chapter) in self.chapters.iter().enumerate() {
            if chapter.id.trim().is_empty() {
                return Err(ExtractError::Config(format!(
                    "Chapter #{} has an empty id",
                    position + 1
                )));
            }
            if normalize_label(&chapter.start_label).is_empty() {
                return Err(ExtractError::Config(format!(
                    "Chapter '{}' is missing start_label",
                    chapter.id
                )));
            }
            if normalize_label(&chapter.end_label).is_empty() {
                return Err(ExtractError::Config(format!(
                    "Chapter '{}' is missing end_label",
                    chapter.id
                )));
            }
            if !seen.insert(chapter.id.as_str()) {
                return Err(ExtractError::Config(format!(
                    "Duplicate chapter id '{}'",
                    chapter.id
                )));
            }
        }

        language_utils::locale_marker(&self.locale).map_err(|e| {
            ExtractError::Config(format!("Invalid locale '{}': {}", self.locale, e))
        })?;

        Ok(())
    }

    /// Replace the target locale, keeping the configuration valid
    pub fn set_locale(&mut self, locale: &str) -> Result<(), ExtractError> {
        let previous = std::mem::replace(&mut self.locale, locale.trim().to_string());
        if let Err(e) = self.validate() {
            self.locale = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Build the extraction profile described by this configuration
    pub fn profile(&self) -> Result<ExtractionProfile, ExtractError> {
        let mut profile = ExtractionProfile::for_locale(&self.locale)?
            .with_overrides(self.music_commands.as_deref(), &self.extra_music_commands);

        for tag in &self.extra_tags {
            if !profile.tags.add(tag) {
                warn!("Ignoring extra tag '{}': empty or already in the vocabulary", tag);
            }
        }

        Ok(profile)
    }

    /// Find the chapter whose id or start label matches `key`
    pub fn find_chapter(&self, key: &str) -> Result<&ChapterSpec, ExtractError> {
        let label_key = normalize_label(key);
        self.chapters
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.chapters.iter().find(|c| c.start_label == label_key))
            .ok_or_else(|| ExtractError::ChapterNotFound {
                key: key.to_string(),
                available: self
                    .chapters
                    .iter()
                    .map(|c| c.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
