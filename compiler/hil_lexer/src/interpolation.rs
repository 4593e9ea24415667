//! Interpolation span scanning.
//!
//! Finds every `${ ... }` region in string literal content or a heredoc line.
//! Each attempt runs the boundary scanner from a candidate `${` and tracks the
//! nesting level of interpolation delimiters:
//!
//! - `${` opens a level (the outermost one records the span start);
//! - the `}` that closes the outermost level emits a span and the scan
//!   continues right after it;
//! - end of input with a level still open emits a span covering the rest of
//!   the text;
//! - any token seen with no level open abandons the attempt, and scanning
//!   resynchronizes one byte past that token's start.
//!
//! Restarting one byte further at level 0 only succeeds once the restart
//! position begins with `${`, so resynchronization jumps straight to the next
//! `${` occurrence instead of re-lexing every byte in between.

use hil_ir::Span;
use hil_lexer_core::{Boundary, RawScanner, SourceBuffer};
use memchr::memmem;

const INTERPOLATION_START: &[u8] = b"${";

/// Tuning knobs for [`InterpolationScanner`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of restarts past text that does not begin an
    /// interpolation. `None` means unlimited.
    ///
    /// When the limit is reached the scan stops and returns the spans found
    /// so far.
    pub resync_limit: Option<u32>,
}

impl ScanConfig {
    /// Cap the number of resynchronizations.
    #[must_use]
    pub fn with_resync_limit(mut self, limit: u32) -> Self {
        self.resync_limit = Some(limit);
        self
    }
}

/// How a single scan attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    /// The outermost interpolation closed.
    Closed(Span),
    /// Input ended inside an interpolation.
    Unterminated(Span),
    /// Input ended with no interpolation open.
    Exhausted,
    /// A token at level 0 that cannot start an interpolation, at this offset.
    Resync(u32),
}

/// Locates `${ ... }` spans in literal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterpolationScanner {
    config: ScanConfig,
}

impl InterpolationScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ScanConfig {
        self.config
    }

    /// Find every interpolation span in `text`.
    ///
    /// Spans are sorted, non-overlapping and non-empty. Text without `${`
    /// yields no spans. Never fails: content that does not tokenize as an
    /// interpolation simply produces fewer spans.
    #[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
    pub fn scan(&self, text: &str) -> Vec<Span> {
        let Some(first) = find_interpolation_start(text) else {
            return Vec::new();
        };

        let buf = SourceBuffer::new(text);
        let mut spans = Vec::new();
        let mut resyncs: u32 = 0;
        let mut skip = first;

        while skip < buf.len() {
            let resume = match attempt(&buf, skip) {
                Attempt::Closed(span) => {
                    spans.push(span);
                    span.end
                }
                Attempt::Unterminated(span) => {
                    spans.push(span);
                    break;
                }
                Attempt::Exhausted => break,
                Attempt::Resync(offset) => offset + 1,
            };

            let Some(next) = next_interpolation(text, resume) else {
                break;
            };
            if next > resume {
                resyncs += 1;
                if self.config.resync_limit.is_some_and(|limit| resyncs > limit) {
                    tracing::debug!(resyncs, offset = resume, "resync limit reached");
                    break;
                }
                tracing::trace!(from = resume, to = next, "resynchronizing");
            }
            skip = next;
        }

        spans
    }
}

/// Find every interpolation span in `text` with the default configuration.
pub fn interpolation_spans(text: &str) -> Vec<Span> {
    InterpolationScanner::default().scan(text)
}

/// Offset of the first `${` that is not directly preceded by `$`.
///
/// A match preceded by `$` is skipped and the search continues one byte after
/// that match. `$${foo}` therefore has no interpolation start, while the
/// second `${` in `$${a}${b}` is found.
#[allow(
    clippy::cast_possible_truncation,
    reason = "literal text is bounded by u32 offsets, like every Span"
)]
pub fn find_interpolation_start(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let finder = memmem::Finder::new(INTERPOLATION_START);
    let mut from = 0;
    loop {
        let index = from + finder.find(bytes.get(from..)?)?;
        if index > 0 && bytes[index - 1] == b'$' {
            from = index + 1;
        } else {
            return Some(index as u32);
        }
    }
}

/// Offset of the next `${` at or after `from`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "literal text is bounded by u32 offsets, like every Span"
)]
fn next_interpolation(text: &str, from: u32) -> Option<u32> {
    let from = from as usize;
    let rest = text.as_bytes().get(from..)?;
    memmem::find(rest, INTERPOLATION_START).map(|index| (from + index) as u32)
}

/// Run the boundary scanner from `skip` until the attempt resolves.
fn attempt(buf: &SourceBuffer, skip: u32) -> Attempt {
    let mut scanner = RawScanner::new(buf.cursor_at(skip));
    let mut level: u32 = 0;
    let mut start = skip;

    loop {
        let token_start = scanner.pos();
        let token = scanner.next_token();
        let token_end = token_start + token.len;

        match token.tag.boundary() {
            Boundary::InterpolationStart => {
                if level == 0 {
                    start = token_start;
                }
                level += 1;
            }
            Boundary::InterpolationEnd => {
                if level == 0 {
                    // stray `}` in plain text
                    return Attempt::Resync(token_start);
                }
                level -= 1;
                if level == 0 {
                    return Attempt::Closed(Span::new(start, token_end));
                }
            }
            Boundary::Eof => {
                return if level > 0 {
                    Attempt::Unterminated(Span::new(start, token_end.min(buf.len())))
                } else {
                    Attempt::Exhausted
                };
            }
            Boundary::Other => {
                if level == 0 {
                    return Attempt::Resync(token_start);
                }
            }
        }
    }
}
