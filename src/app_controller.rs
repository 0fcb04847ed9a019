use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::app_config::{ChapterSpec, Config, ExtractionProfile};
use crate::document::{ChapterDocument, DocumentAssembler};
use crate::errors::{ExtractError, ExtractWarning, WarningKind};
use crate::script::labels::LabelIndex;
use crate::script::slicer;
use crate::script::{LineClassifier, ScriptFile};

// @module: Application controller for chapter extraction

/// In-memory result of extracting one chapter
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: ChapterDocument,
    pub warnings: Vec<ExtractWarning>,
    /// Lines in the slice that produced no entry
    pub discarded: usize,
}

/// Result of a completed run: the written file plus what went into it
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub output_path: PathBuf,
    pub document: ChapterDocument,
    pub warnings: Vec<ExtractWarning>,
}

/// Main application controller for chapter extraction
pub struct Controller {
    // @field: Chapter plan
    config: Config,
    // @field: Locale, cue and tag settings
    classifier: LineClassifier,
}

impl Controller {
    // @method: Create a controller with the profile the configuration describes
    pub fn with_config(config: Config) -> Result<Self, ExtractError> {
        let profile = config.profile()?;
        Ok(Self::with_profile(config, profile))
    }

    // @method: Create a controller with an explicit profile
    pub fn with_profile(config: Config, profile: ExtractionProfile) -> Self {
        debug!(
            "Extraction profile: marker '{}', music commands [{}], {} inline tags",
            profile.locale_marker,
            profile.music_commands.join(", "),
            profile.tags.inline_rules().len()
        );

        Self {
            config,
            classifier: LineClassifier::new(profile),
        }
    }

    /// Find a chapter by id or start label
    pub fn find_chapter(&self, key: &str) -> Result<&ChapterSpec, ExtractError> {
        self.config.find_chapter(key)
    }

    /// Extract a chapter from an already loaded script
    pub fn extract(&self, script: &ScriptFile, chapter: &ChapterSpec) -> Result<Extraction, ExtractError> {
        let index = LabelIndex::build(script.lines());
        debug!("Indexed {} labels over {} lines", index.len(), script.len());

        let slice = slicer::slice(script, &index, &chapter.start_label, &chapter.end_label)?;
        debug!(
            "Chapter '{}' spans lines {}..{} ({} lines)",
            chapter.id,
            slice.start() + 1,
            slice.end() + 1,
            slice.len()
        );

        let mut warnings = index.duplicate_warnings(&[chapter.start_label.as_str(), chapter.end_label.as_str()]);

        let classification = self.classifier.classify_slice(slice);
        warnings.extend(classification.warnings);

        let mut assembler = DocumentAssembler::new(chapter, &self.config.speakers);
        assembler.extend(classification.lines);
        let (document, assembler_warnings) = assembler.finish();
        warnings.extend(assembler_warnings);

        debug!(
            "Chapter '{}': {} entries ({} dialogue), {} lines discarded",
            chapter.id,
            document.entries.len(),
            document.count_dialogue(),
            classification.discarded
        );

        Ok(Extraction {
            document,
            warnings,
            discarded: classification.discarded,
        })
    }

    /// Load the script, extract the chapter and write `{id}.json`.
    ///
    /// Every fatal condition is raised before the output file is touched.
    pub fn run<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        script_path: P1,
        chapter_key: &str,
        output_dir: P2,
    ) -> Result<ExtractionReport, ExtractError> {
        let chapter = self.find_chapter(chapter_key)?;
        info!("Extracting chapter '{}' ({})", chapter.id, chapter.title);

        let script = ScriptFile::load(script_path)?;
        let extraction = self.extract(&script, chapter)?;
        log_warnings(&extraction.warnings);

        let output_path = extraction.document.write_to(output_dir)?;
        info!(
            "Wrote {} entries to {}",
            extraction.document.entries.len(),
            output_path.display()
        );

        Ok(ExtractionReport {
            output_path,
            document: extraction.document,
            warnings: extraction.warnings,
        })
    }
}

/// Log each warning, then a per-kind summary
pub fn log_warnings(warnings: &[ExtractWarning]) {
    if warnings.is_empty() {
        return;
    }

    for warning in warnings {
        warn!("{}", warning);
    }

    let mut by_kind: BTreeMap<WarningKind, usize> = BTreeMap::new();
    for warning in warnings {
        *by_kind.entry(warning.kind()).or_default() += 1;
    }
    let summary = by_kind
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect::<Vec<_>>()
        .join(", ");
    warn!("Extraction finished with warnings: {}", summary);

    let mut missing: Vec<&str> = warnings
        .iter()
        .filter_map(|w| match w {
            ExtractWarning::UnresolvedSpeaker { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();
    missing.sort_unstable();
    missing.dedup();
    if !missing.is_empty() {
        warn!("Add these speaker ids to the roster: {}", missing.join(", "));
    }
}
