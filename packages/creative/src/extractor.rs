// ABOUTME: Heuristic extraction of per-platform fields from loosely formatted generated text
// ABOUTME: Scans marker lines, captures field values and falls back to placeholder copy

use std::fmt;

use elbitat_core::{
    CampaignRequest, CopyFields, FacebookCopy, InstagramCopy, Platform, TikTokCopy,
};
use tracing::debug;

use crate::placeholder;

/// Captured values shorter than this are replaced by placeholders
pub const DEFAULT_MIN_FIELD_LEN: usize = 10;

/// Keys longer than this before a colon are ordinary sentences, not labels
const MAX_KEY_LEN: usize = 40;

const DIVIDER_CHARS: &[char] = &['-', '=', '*', '_', '~'];

/// Words allowed in a colon-less marker line besides platform and field words
const FILLER_WORDS: &[&str] = &["for", "and", "the", "a", "ad", "video", "reel", "content", "version"];

/// How much of the platform's copy came from the text itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Every field was replaced by a placeholder
    None,
    Partial,
    Complete,
}

impl fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractionOutcome::None => "none",
            ExtractionOutcome::Partial => "partial",
            ExtractionOutcome::Complete => "complete",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub fields: CopyFields,
    pub outcome: ExtractionOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLabel {
    Caption,
    Hashtags,
    Message,
    Script,
}

/// Slot a captured value lands in for the platform being extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// caption (Instagram, TikTok) or message (Facebook)
    Primary,
    /// hashtags (Instagram) or script (TikTok)
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker<'a> {
    platforms: Vec<Platform>,
    label: Option<FieldLabel>,
    value: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Divider,
    Hashtags(&'a str),
    Marker(Marker<'a>),
    Text(&'a str),
}

/// Platform and field words found in a piece of text
#[derive(Debug, Default)]
struct Vocabulary {
    platforms: Vec<Platform>,
    label: Option<FieldLabel>,
    /// Every word was a platform, field or filler word
    only_vocabulary: bool,
}

fn scan_vocabulary(text: &str) -> Vocabulary {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let mut vocab = Vocabulary {
        only_vocabulary: !words.is_empty(),
        ..Default::default()
    };

    let mut i = 0;
    while i < words.len() {
        let word = words[i].as_str();
        let next = words.get(i + 1).map(String::as_str);

        let platform = match (word, next) {
            ("tik", Some("tok")) => {
                i += 1;
                Some(Platform::TikTok)
            }
            ("instagram", _) => Some(Platform::Instagram),
            ("facebook", _) => Some(Platform::Facebook),
            ("tiktok", _) => Some(Platform::TikTok),
            _ => None,
        };

        let label = match word {
            "caption" | "captions" => Some(FieldLabel::Caption),
            "hashtag" | "hashtags" | "tags" => Some(FieldLabel::Hashtags),
            "message" | "post" | "text" | "copy" => Some(FieldLabel::Message),
            "script" => Some(FieldLabel::Script),
            _ => None,
        };

        if let Some(p) = platform {
            if !vocab.platforms.contains(&p) {
                vocab.platforms.push(p);
            }
        } else if let Some(l) = label {
            vocab.label.get_or_insert(l);
        } else if !FILLER_WORDS.contains(&word) {
            vocab.only_vocabulary = false;
        }
        i += 1;
    }

    vocab
}

/// Strip Markdown heading hashes, list bullets and surrounding bold markers.
/// Returns the inner text and whether heading or bold decoration was present.
fn strip_decoration(line: &str) -> (&str, bool) {
    let mut text = line.trim();
    let mut decorated = false;

    if text.starts_with('#') {
        let without_hashes = text.trim_start_matches('#');
        if without_hashes.starts_with(' ') || without_hashes.is_empty() {
            text = without_hashes.trim();
            decorated = true;
        }
    }

    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = text.strip_prefix(bullet) {
            text = rest.trim_start();
            break;
        }
    }

    for wrapper in ["**", "__"] {
        if text.len() > 2 * wrapper.len() && text.starts_with(wrapper) && text.ends_with(wrapper) {
            text = text[wrapper.len()..text.len() - wrapper.len()].trim();
            decorated = true;
        }
    }

    (text, decorated)
}

fn is_divider(line: &str) -> bool {
    line.chars().count() >= 3 && line.chars().all(|c| DIVIDER_CHARS.contains(&c))
}

fn is_hashtag_line(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('#') && chars.next().is_some_and(|c| c.is_alphanumeric())
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if is_divider(line) {
        return Line::Divider;
    }
    if is_hashtag_line(line) {
        return Line::Hashtags(line);
    }

    let (inner, decorated) = strip_decoration(line);

    if let Some((key, value)) = inner.split_once(':') {
        let key = key.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
        if key.chars().count() <= MAX_KEY_LEN {
            let vocab = scan_vocabulary(key);
            let names_something = !vocab.platforms.is_empty() || vocab.label.is_some();
            // The key must be made of marker words only, so "Post your photos: ..." stays text
            if names_something && vocab.only_vocabulary {
                return Line::Marker(Marker {
                    platforms: vocab.platforms,
                    label: vocab.label,
                    value: value.trim().trim_start_matches(['*', '_']).trim_start(),
                });
            }
        }
    }

    let vocab = scan_vocabulary(inner);
    let names_something = !vocab.platforms.is_empty() || vocab.label.is_some();
    if names_something && (vocab.only_vocabulary || (decorated && !inner.contains(':'))) {
        return Line::Marker(Marker {
            platforms: vocab.platforms,
            label: vocab.label,
            value: "",
        });
    }

    Line::Text(line)
}

/// Trim, drop bold markers and strip one pair of wrapping quotes
fn clean_value(value: &str) -> String {
    let text = value.replace("**", "");
    let text = text.trim();

    let quote_pairs = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];
    for (open, close) in quote_pairs {
        if text.chars().count() >= 2 && text.starts_with(open) && text.ends_with(close) {
            let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];
            return inner.trim().to_string();
        }
    }
    text.to_string()
}

fn slot_for(platform: Platform, label: Option<FieldLabel>) -> Option<Slot> {
    match (platform, label) {
        (_, None) | (_, Some(FieldLabel::Caption)) | (_, Some(FieldLabel::Message)) => {
            Some(Slot::Primary)
        }
        (Platform::Instagram, Some(FieldLabel::Hashtags)) => Some(Slot::Secondary),
        (Platform::TikTok, Some(FieldLabel::Script)) => Some(Slot::Secondary),
        _ => None,
    }
}

/// Values captured from a section; the first capture of each slot wins
#[derive(Debug, Default)]
struct Captures {
    primary: Option<String>,
    secondary: Option<String>,
    hashtag_lines: Vec<String>,
}

impl Captures {
    fn get(&self, slot: Slot) -> &Option<String> {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Secondary => &self.secondary,
        }
    }

    fn commit(&mut self, slot: Slot, buffer: &str) {
        let value = clean_value(buffer);
        if value.is_empty() {
            return;
        }
        let target = match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
        };
        if target.is_none() {
            *target = Some(value);
        }
    }

    fn close(&mut self, open: &mut Option<OpenField>) {
        if let Some(field) = open.take() {
            self.commit(field.slot, &field.buffer);
        }
    }
}

/// Field currently receiving lines
struct OpenField {
    slot: Slot,
    buffer: String,
    keeps_blank_lines: bool,
}

impl OpenField {
    fn new(slot: Slot, keeps_blank_lines: bool) -> Self {
        Self {
            slot,
            buffer: String::new(),
            keeps_blank_lines,
        }
    }

    fn push_line(&mut self, line: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
    }
}

/// Deterministic line-scanning extractor
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor {
    min_field_len: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FIELD_LEN)
    }
}

impl TextExtractor {
    pub fn new(min_field_len: usize) -> Self {
        Self { min_field_len }
    }

    pub fn min_field_len(&self) -> usize {
        self.min_field_len
    }

    /// Extract the fields for `platform` from `text`, filling gaps with placeholders
    pub fn extract(&self, text: &str, platform: Platform, request: &CampaignRequest) -> Extraction {
        let lines: Vec<Line<'_>> = text.lines().map(classify).collect();
        let section = Self::section_for(&lines, platform);
        let captures = Self::capture(section, platform);

        let secondary = match platform {
            Platform::Instagram => captures.secondary.clone().or_else(|| {
                (!captures.hashtag_lines.is_empty()).then(|| captures.hashtag_lines.join(" "))
            }),
            _ => captures.secondary.clone(),
        };

        let extraction =
            self.complete_fields(platform, captures.primary.as_deref(), secondary.as_deref(), request);
        debug!("Extracted {} copy: {}", platform, extraction.outcome);
        extraction
    }

    /// Build the platform's fields from captured values, applying the length threshold.
    /// `secondary` is hashtags for Instagram, script for TikTok and unused for Facebook.
    pub fn complete_fields(
        &self,
        platform: Platform,
        primary: Option<&str>,
        secondary: Option<&str>,
        request: &CampaignRequest,
    ) -> Extraction {
        let mut used = 0;
        let mut total = 0;
        let mut accept = |value: Option<&str>, fallback: String| -> String {
            total += 1;
            match value.map(str::trim) {
                Some(v) if v.chars().count() >= self.min_field_len => {
                    used += 1;
                    v.to_string()
                }
                _ => fallback,
            }
        };

        let fields = match platform {
            Platform::Instagram => CopyFields::Instagram(InstagramCopy {
                caption: accept(primary, placeholder::instagram_caption(request)),
                hashtags: accept(secondary, placeholder::instagram_hashtags(request)),
            }),
            Platform::Facebook => CopyFields::Facebook(FacebookCopy {
                message: accept(primary, placeholder::facebook_message(request)),
            }),
            Platform::TikTok => CopyFields::TikTok(TikTokCopy {
                caption: accept(primary, placeholder::tiktok_caption(request)),
                script: accept(secondary, placeholder::tiktok_script(request)),
            }),
        };

        let outcome = if used == 0 {
            ExtractionOutcome::None
        } else if used == total {
            ExtractionOutcome::Complete
        } else {
            ExtractionOutcome::Partial
        };

        Extraction { fields, outcome }
    }

    /// Lines belonging to `platform`: whole text when no marker names any platform,
    /// empty when only other platforms are named
    fn section_for<'l, 'a>(lines: &'l [Line<'a>], platform: Platform) -> &'l [Line<'a>] {
        let names_platform = |line: &Line<'_>| match line {
            Line::Marker(m) => !m.platforms.is_empty(),
            _ => false,
        };
        if !lines.iter().any(names_platform) {
            return lines;
        }

        let start = lines.iter().position(|line| match line {
            Line::Marker(m) => m.platforms.contains(&platform),
            _ => false,
        });
        let Some(start) = start else {
            return &[];
        };

        let end = lines[start + 1..]
            .iter()
            .position(|line| match line {
                Line::Marker(m) => !m.platforms.is_empty() && !m.platforms.contains(&platform),
                _ => false,
            })
            .map(|offset| start + 1 + offset)
            .unwrap_or(lines.len());

        &lines[start..end]
    }

    fn capture(section: &[Line<'_>], platform: Platform) -> Captures {
        let mut captures = Captures::default();
        let mut open: Option<OpenField> = None;
        let section_has_markers = section.iter().any(|l| matches!(l, Line::Marker(_)));

        for line in section {
            match line {
                Line::Marker(marker) => {
                    captures.close(&mut open);
                    if let Some(slot) = slot_for(platform, marker.label) {
                        if captures.get(slot).is_none() {
                            let mut field = OpenField::new(
                                slot,
                                platform == Platform::TikTok && slot == Slot::Secondary,
                            );
                            if !marker.value.is_empty() {
                                field.push_line(marker.value);
                            }
                            open = Some(field);
                        }
                    }
                }
                Line::Divider => captures.close(&mut open),
                Line::Blank => {
                    // A label on its own line still waits for its first paragraph
                    let waiting = open.as_ref().is_some_and(|f| f.buffer.is_empty());
                    let keep = open.as_ref().is_some_and(|f| f.keeps_blank_lines);
                    if waiting {
                        continue;
                    }
                    if keep {
                        if let Some(field) = open.as_mut() {
                            field.buffer.push('\n');
                        }
                    } else {
                        captures.close(&mut open);
                    }
                }
                Line::Hashtags(tags) => {
                    let into_open_hashtags = platform == Platform::Instagram
                        && open.as_ref().is_some_and(|f| f.slot == Slot::Secondary);
                    if into_open_hashtags {
                        if let Some(field) = open.as_mut() {
                            field.push_line(tags);
                        }
                    } else {
                        captures.close(&mut open);
                        captures.hashtag_lines.push(tags.to_string());
                    }
                }
                Line::Text(text) => {
                    if let Some(field) = open.as_mut() {
                        field.push_line(text);
                    } else if !section_has_markers && captures.primary.is_none() {
                        // Unlabelled text opens the primary field only when nothing is labelled
                        let mut field = OpenField::new(Slot::Primary, false);
                        field.push_line(text);
                        open = Some(field);
                    }
                }
            }
        }
        captures.close(&mut open);

        captures
    }
}
