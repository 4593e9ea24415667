//! Placement of embedded languages inside HCL literal hosts.
//!
//! Decides where interpolation regions go in string literals and heredoc
//! content, and which leftover regions of a heredoc carry another embedded
//! language. Everything here works on host text and returns spans relative
//! to it; registering the regions is up to the caller.

use hil_ir::Span;
use memchr::memmem;

use crate::fragments::text_fragments;
use crate::interpolation::interpolation_spans;

const TFVARS_SUFFIX: &str = ".tfvars";

/// The file a literal host lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileContext<'a> {
    pub file_name: &'a str,
    /// Whether the file's dialect supports `${ ... }` at all.
    pub interpolations_allowed: bool,
}

impl<'a> FileContext<'a> {
    pub fn new(file_name: &'a str, interpolations_allowed: bool) -> Self {
        FileContext {
            file_name,
            interpolations_allowed,
        }
    }

    /// Variable definition files never carry interpolations.
    pub fn accepts_interpolations(&self) -> bool {
        self.interpolations_allowed && !self.file_name.ends_with(TFVARS_SUFFIX)
    }
}

/// A literal that may host interpolations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralHost<'a> {
    /// A string literal, quotes included.
    StringLiteral(&'a str),
    /// The content of a heredoc, without its marker lines.
    HeredocContent(&'a str),
}

/// Interpolation spans inside `host`, relative to the host text.
pub fn interpolation_places(context: &FileContext<'_>, host: LiteralHost<'_>) -> Vec<Span> {
    if !context.accepts_interpolations() {
        return Vec::new();
    }
    match host {
        LiteralHost::StringLiteral(text) => string_literal_places(text),
        LiteralHost::HeredocContent(text) => heredoc_content_places(text),
    }
}

fn string_literal_places(text: &str) -> Vec<Span> {
    if memmem::find(text.as_bytes(), b"${").is_none() {
        return Vec::new();
    }
    text_fragments(text, true, true)
        .iter()
        .filter(|fragment| fragment.is_interpolation())
        .flat_map(|fragment| {
            let shift = fragment.span.start;
            interpolation_spans(&fragment.text)
                .into_iter()
                .map(move |span| span.shift_right(shift))
        })
        .collect()
}

/// Scan each line on its own, newline included.
#[allow(
    clippy::cast_possible_truncation,
    reason = "literal text is bounded by u32 offsets, like every Span"
)]
fn heredoc_content_places(text: &str) -> Vec<Span> {
    let mut places = Vec::new();
    let mut offset: u32 = 0;
    for line in text.split_inclusive('\n') {
        places.extend(
            interpolation_spans(line)
                .into_iter()
                .map(|span| span.shift_right(offset)),
        );
        offset = offset.saturating_add(line.len() as u32);
    }
    places
}

/// A language recognized from the start of heredoc content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmbeddedLanguage {
    /// Content starting with `{`.
    Json,
    /// Content starting with a `#!` shebang.
    Shell,
}

/// Detect the embedded language of heredoc content, if any.
pub fn heredoc_language(text: &str) -> Option<EmbeddedLanguage> {
    if text.starts_with('{') {
        Some(EmbeddedLanguage::Json)
    } else if text.starts_with("#!") {
        Some(EmbeddedLanguage::Shell)
    } else {
        None
    }
}

/// Embedded regions of one heredoc.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeredocInjection {
    /// Language detected for the leftover regions.
    pub language: Option<EmbeddedLanguage>,
    /// `value_range` minus every interpolation, in order. Empty unless a
    /// language was detected.
    pub leftovers: Vec<Span>,
    /// Interpolation spans over the whole content.
    pub interpolations: Vec<Span>,
}

/// Split heredoc content into interpolations and embedded-language leftovers.
///
/// `value_range` is the part of `text` holding the heredoc value.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn heredoc_injections(text: &str, value_range: Span) -> HeredocInjection {
    if text.is_empty() {
        return HeredocInjection::default();
    }

    let interpolations = interpolation_spans(text);
    let language = heredoc_language(text);
    let leftovers = if language.is_some() {
        subtract(value_range, &interpolations)
    } else {
        Vec::new()
    };

    HeredocInjection {
        language,
        leftovers,
        interpolations,
    }
}

/// `range` minus sorted, non-overlapping `holes`, dropping empty pieces.
fn subtract(range: Span, holes: &[Span]) -> Vec<Span> {
    let mut pieces = Vec::new();
    let mut cursor = range.start;
    for hole in holes {
        if hole.end <= cursor || hole.start >= range.end {
            continue;
        }
        if hole.start > cursor {
            pieces.push(Span::new(cursor, hole.start));
        }
        cursor = hole.end;
    }
    if cursor < range.end {
        pieces.push(Span::new(cursor, range.end));
    }
    pieces
}
