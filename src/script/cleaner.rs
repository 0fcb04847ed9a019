/*!
 * Control-code stripping for localized text lines.
 *
 * Localized text in the scenario script is interleaved with engine markup:
 * voice tags (`:dwave_eng 0, 10/10100001:`), timing tags (`:voicedelay 900:`),
 * text delimiters (`^`), click waits (`@`, `@/`), page waits (`\`), speed and
 * wait sigils (`!sd`, `!w800`) and formatting toggles (`~i~`). The cleaner
 * removes all of it and leaves plain prose.
 *
 * The source format is not fully documented, so tags that look like inline
 * sigils but are not in the vocabulary are stripped anyway and reported back
 * to the caller instead of failing the run.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::normalize_speaker_id;

/// Runs of two or more spaces
static SPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" {2,}").expect("Invalid space run regex")
});

/// Three or more consecutive line breaks
static EXCESS_NEWLINES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{3,}").expect("Invalid newline run regex")
});

/// Longest body accepted for an unknown `~...~` formatting tag
const MAX_UNKNOWN_FORMAT_TAG_LEN: usize = 8;

/// An inline tag in the cleaning vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// Literal text of the tag, e.g. `!sd` or `!w`
    pub token: String,
    /// Whether the token is followed by a decimal argument (`!w800`)
    pub numeric_arg: bool,
}

impl TagRule {
    pub fn literal(token: &str) -> Self {
        Self {
            token: token.to_string(),
            numeric_arg: false,
        }
    }

    pub fn numeric(token: &str) -> Self {
        Self {
            token: token.to_string(),
            numeric_arg: true,
        }
    }

    /// Parse a rule from configuration notation: `~u~` is a literal tag and
    /// `!v<N>` a tag followed by a number.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let rule = match spec.strip_suffix("<N>") {
            Some(token) => Self::numeric(token),
            None => Self::literal(spec),
        };
        if rule.token.is_empty() { None } else { Some(rule) }
    }

    /// Length in bytes of this tag at the start of `text`
    fn match_len(&self, text: &str) -> Option<usize> {
        let rest = text.strip_prefix(self.token.as_str())?;
        if !self.numeric_arg {
            return Some(self.token.len());
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        (digits > 0).then_some(self.token.len() + digits)
    }
}

/// Kind of a colon-delimited command embedded in text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Voice,
    Timing,
}

/// A colon-delimited command found at the start of some text
struct ColonTag<'t> {
    kind: CommandKind,
    args: &'t str,
    len: usize,
}

/// The set of tags the cleaner recognizes.
///
/// Inline rules are kept sorted longest token first so that `!sd` wins over
/// `!s<N>` and similar overlapping prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    inline: Vec<TagRule>,
    voice_commands: Vec<String>,
    timing_commands: Vec<String>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        let mut vocabulary = Self {
            inline: vec![
                TagRule::literal("!sd"),
                TagRule::numeric("!s"),
                TagRule::numeric("!w"),
                TagRule::numeric("!d"),
                TagRule::literal("~i~"),
                TagRule::literal("~b~"),
                TagRule::literal("~ib~"),
                TagRule::literal("~bi~"),
            ],
            voice_commands: vec![
                "dwave_eng".to_string(),
                "dwave_jp".to_string(),
                "dwave".to_string(),
            ],
            timing_commands: vec![
                "voicedelay".to_string(),
                "delay".to_string(),
                "wait".to_string(),
            ],
        };
        vocabulary.sort();
        vocabulary
    }
}

impl TagVocabulary {
    /// Add an inline tag in `TagRule::parse` notation. Returns false when the
    /// spec is empty or already known.
    pub fn add(&mut self, spec: &str) -> bool {
        let Some(rule) = TagRule::parse(spec) else {
            return false;
        };
        if self.inline.contains(&rule) {
            return false;
        }
        self.inline.push(rule);
        self.sort();
        true
    }

    pub fn inline_rules(&self) -> &[TagRule] {
        &self.inline
    }

    fn sort(&mut self) {
        self.inline
            .sort_by(|a, b| b.token.len().cmp(&a.token.len()));
    }

    fn starts_inline_tag(&self, c: char) -> bool {
        c == '!' || c == '~' || self.inline.iter().any(|r| r.token.starts_with(c))
    }

    /// Longest known inline tag at the start of `text`
    fn match_inline(&self, text: &str) -> Option<usize> {
        self.inline.iter().find_map(|rule| rule.match_len(text))
    }

    /// A `:name args:` command at the start of `text`
    fn match_colon_tag<'t>(&self, text: &'t str) -> Option<ColonTag<'t>> {
        let body = text.strip_prefix(':')?;
        let name_len = body
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let name = &body[..name_len];

        let kind = if self.voice_commands.iter().any(|c| c == name) {
            CommandKind::Voice
        } else if self.timing_commands.iter().any(|c| c == name) {
            CommandKind::Timing
        } else {
            return None;
        };

        let after = &body[name_len..];
        if !after.starts_with([' ', '\t']) {
            return None;
        }
        let close = after.find(':')?;

        Some(ColonTag {
            kind,
            args: after[..close].trim(),
            len: 1 + name_len + close + 1,
        })
    }
}

/// Length of something shaped like an inline tag but not in the vocabulary
fn unknown_tag_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.first()? {
        b'!' => {
            let n = bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count();
            (n > 0).then_some(1 + n)
        }
        b'~' => {
            let n = bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-'))
                .count();
            let closed = bytes.get(1 + n) == Some(&b'~');
            (n > 0 && n <= MAX_UNKNOWN_FORMAT_TAG_LEN && closed).then_some(n + 2)
        }
        _ => None,
    }
}

/// Character id from voice tag arguments such as `0, 10/10100001`.
///
/// Voice files live in one directory per character; the first all-digit
/// directory wins, otherwise the first directory.
fn voice_speaker_id(args: &str) -> Option<String> {
    let path = args.rsplit(',').next()?.trim().trim_matches('"');
    let mut dirs: Vec<&str> = path.split(['/', '\\']).map(str::trim).collect();
    dirs.pop();

    let dir = dirs
        .iter()
        .find(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
        .or_else(|| dirs.iter().find(|d| !d.is_empty()))?;

    Some(normalize_speaker_id(dir))
}

/// Result of cleaning one text body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedText {
    /// Plain prose, lines separated by `\n`
    pub text: String,
    /// Number of voice tags removed
    pub voice_tags: usize,
    /// Character id from the first voice tag that carried one
    pub speaker_id: Option<String>,
    /// Unknown tags stripped permissively, in order of appearance
    pub unrecognized_tags: Vec<String>,
}

impl CleanedText {
    /// Whether the text carried a speaker-voice construct
    pub fn has_voice(&self) -> bool {
        self.voice_tags > 0
    }
}

/// Strips engine markup from localized text
#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    vocabulary: TagVocabulary,
}

impl TextCleaner {
    pub fn new(vocabulary: TagVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Clean a text body.
    ///
    /// The strip and tidy steps repeat until the text stops changing, so a
    /// tag that only forms once its neighbours are removed is caught too and
    /// cleaning already-clean text is a no-op. Every changing pass shortens
    /// the text or replaces a click wait with a line break, so this ends.
    ///
    /// Prose can join into a tag shape once delimiters are gone: `^Wow!^^Now^`
    /// cleans to `Wow` and reports `!Now` as an unrecognized tag.
    pub fn clean(&self, raw: &str) -> CleanedText {
        let mut result = CleanedText::default();
        let mut current = raw.to_string();

        loop {
            let next = Self::tidy(&self.strip_pass(&current, &mut result));
            if next == current {
                break;
            }
            current = next;
        }

        result.text = current;
        result
    }

    /// Cleaned text only
    pub fn clean_text(&self, raw: &str) -> String {
        self.clean(raw).text
    }

    fn strip_pass(&self, text: &str, result: &mut CleanedText) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            let consumed = match c {
                ':' => match self.vocabulary.match_colon_tag(rest) {
                    Some(tag) => {
                        if tag.kind == CommandKind::Voice {
                            result.voice_tags += 1;
                            if result.speaker_id.is_none() {
                                result.speaker_id = voice_speaker_id(tag.args);
                            }
                        }
                        tag.len
                    }
                    None => {
                        out.push(':');
                        1
                    }
                },
                '^' | '\\' => 1,
                '@' => {
                    out.push('\n');
                    if rest[1..].starts_with('/') { 2 } else { 1 }
                }
                '\n' => {
                    out.push('\n');
                    1
                }
                '\t' => {
                    out.push(' ');
                    1
                }
                c if c.is_control() => c.len_utf8(),
                c if self.vocabulary.starts_inline_tag(c) => {
                    if let Some(len) = self.vocabulary.match_inline(rest) {
                        len
                    } else if let Some(len) = unknown_tag_len(rest) {
                        result.unrecognized_tags.push(rest[..len].to_string());
                        len
                    } else {
                        out.push(c);
                        c.len_utf8()
                    }
                }
                c => {
                    out.push(c);
                    c.len_utf8()
                }
            };
            rest = &rest[consumed..];
        }

        out
    }

    fn tidy(text: &str) -> String {
        let collapsed = SPACE_RUN_REGEX.replace_all(text, " ");
        let joined = collapsed
            .split('\n')
            .map(|line| {
                let line = line.trim();
                match line.strip_prefix(':') {
                    Some(rest) => rest.trim_start(),
                    None => line,
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        EXCESS_NEWLINES_REGEX
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string()
    }
}
