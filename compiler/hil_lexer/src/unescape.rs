//! Escape decoding for HCL string and heredoc literal text.
//!
//! Decoding keeps a table from every decoded byte back to the source byte
//! that produced it, so edits and diagnostics on the logical value can be
//! mapped onto the raw literal.
//!
//! # Escapes
//!
//! - Simple: `\a` `\b` `\f` `\n` `\t` `\r` `\v` `\\` `\"`
//! - Octal: `\7`, `\17`, `\101` (a third digit only after a leading `0`-`3`)
//! - Hex: `\xHH`, `\uHHHH`, `\UHHHHHHHH`
//!
//! With interpolation passthrough enabled, `${ ... }` regions are copied
//! verbatim up to the balancing `}`.

use hil_ir::Span;
use memchr::memchr;

/// Result of a strict decode.
pub type DecodeOutcome = Result<DecodedString, DecodeError>;

/// Why a literal could not be decoded.
///
/// Every variant carries the source offset of the escape's backslash.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("trailing backslash at offset {offset}")]
    TrailingBackslash { offset: u32 },
    #[error("unknown escape `\\{escape}` at offset {offset}")]
    InvalidEscape { offset: u32, escape: char },
    #[error("`\\{escape}` escape at offset {offset} needs {expected} hex digits")]
    TruncatedHex {
        offset: u32,
        escape: char,
        expected: u8,
    },
    #[error("`\\{escape}` escape at offset {offset} has non-hex digit `{digit}`")]
    InvalidHexDigit {
        offset: u32,
        escape: char,
        digit: char,
    },
    #[error("`\\{escape}` escape at offset {offset} starts with a sign")]
    SignedHex { offset: u32, escape: char },
    #[error("escape at offset {offset} encodes line break {code:?}")]
    LineSeparator { offset: u32, code: char },
    #[error("escape at offset {offset} encodes invalid code point {code:#X}")]
    InvalidCodePoint { offset: u32, code: u64 },
}

impl DecodeError {
    /// Source offset of the backslash that started the failing escape.
    pub fn offset(&self) -> u32 {
        match *self {
            DecodeError::TrailingBackslash { offset }
            | DecodeError::InvalidEscape { offset, .. }
            | DecodeError::TruncatedHex { offset, .. }
            | DecodeError::InvalidHexDigit { offset, .. }
            | DecodeError::SignedHex { offset, .. }
            | DecodeError::LineSeparator { offset, .. }
            | DecodeError::InvalidCodePoint { offset, .. } => offset,
        }
    }
}

/// A decoded literal value with its offset table.
///
/// `offsets[i]` is the source offset of the unit that produced decoded byte
/// `i`. Bytes of an escape result all map to the escape's backslash. The
/// table has one extra entry, the source length, so `offsets.len()` is
/// `value.len() + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedString {
    value: String,
    offsets: Vec<u32>,
}

impl DecodedString {
    /// The decoded text.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// The decoded-offset to source-offset table.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Length of the decoded text in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Source offset of decoded offset `decoded`.
    ///
    /// `decoded == len()` maps to the source length. Anything past that is
    /// `None`.
    #[inline]
    pub fn source_offset(&self, decoded: usize) -> Option<u32> {
        self.offsets.get(decoded).copied()
    }

    /// Host offset of decoded offset `decoded` for a literal whose raw text
    /// occupies `window` in the host.
    ///
    /// Returns `None` when the offset is out of the table or lands past
    /// `window.end`.
    pub fn offset_in_host(&self, decoded: usize, window: Span) -> Option<u32> {
        let host = window.start.checked_add(self.source_offset(decoded)?)?;
        (host <= window.end).then_some(host)
    }

    /// Identity decoding: `text` verbatim with `offsets[i] == i`.
    fn verbatim(text: &str) -> Self {
        let len = offset_of(text.len());
        DecodedString {
            value: text.to_owned(),
            offsets: (0..=len).collect(),
        }
    }
}

impl std::fmt::Display for DecodedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for DecodedString {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Decode `text`, failing on the first malformed escape.
///
/// With `interpolations` set, `${ ... }` regions are copied through without
/// escape processing.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn decode(text: &str, interpolations: bool) -> DecodeOutcome {
    if memchr(b'\\', text.as_bytes()).is_none() {
        return Ok(DecodedString::verbatim(text));
    }
    Decoder::new(text, interpolations, false)
        .run()
        .inspect_err(|err| tracing::debug!(%err, "literal decode failed"))
}

/// Decode `text`, keeping malformed escapes literally.
///
/// An escape that cannot be decoded contributes its backslash and the
/// following character verbatim, and decoding resumes after them. A trailing
/// backslash is kept. Equal to [`decode`] whenever that succeeds.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn safe_decode(text: &str, interpolations: bool) -> DecodedString {
    if memchr(b'\\', text.as_bytes()).is_none() {
        return DecodedString::verbatim(text);
    }
    // Lossy decoding handles every error itself.
    Decoder::new(text, interpolations, true)
        .run()
        .unwrap_or_else(|_| DecodedString::verbatim(text))
}

/// Single left-to-right decoding pass.
struct Decoder<'a> {
    text: &'a str,
    interpolations: bool,
    lossy: bool,
    value: String,
    offsets: Vec<u32>,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str, interpolations: bool, lossy: bool) -> Self {
        Decoder {
            text,
            interpolations,
            lossy,
            value: String::with_capacity(text.len()),
            offsets: Vec::with_capacity(text.len() + 1),
        }
    }

    fn run(mut self) -> DecodeOutcome {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut pos = 0;
        // Open braces of the current passthrough region; 0 outside one.
        let mut braces: u32 = 0;

        while let Some(c) = self.char_at(pos) {
            if braces > 0 {
                match c {
                    '{' => braces += 1,
                    '}' => braces -= 1,
                    _ => {}
                }
                self.push_verbatim(c, pos);
                pos += c.len_utf8();
            } else if self.interpolations && c == '$' && bytes.get(pos + 1) == Some(&b'{') {
                self.push_verbatim('$', pos);
                self.push_verbatim('{', pos + 1);
                braces = 1;
                pos += 2;
            } else if c == '\\' {
                pos = self.escape(pos)?;
            } else {
                self.push_verbatim(c, pos);
                pos += c.len_utf8();
            }
        }

        self.offsets.push(offset_of(text.len()));
        Ok(DecodedString {
            value: self.value,
            offsets: self.offsets,
        })
    }

    /// Decode the escape whose backslash is at `pos`; returns the offset
    /// after it.
    fn escape(&mut self, pos: usize) -> Result<usize, DecodeError> {
        match parse_escape(self.text, pos) {
            Ok((c, next)) => {
                self.push_escaped(c, pos);
                Ok(next)
            }
            Err(err) if self.lossy => {
                tracing::trace!(%err, "keeping malformed escape literally");
                self.push_verbatim('\\', pos);
                match self.char_at(pos + 1) {
                    Some(c) => {
                        self.push_verbatim(c, pos + 1);
                        Ok(pos + 1 + c.len_utf8())
                    }
                    None => Ok(pos + 1),
                }
            }
            Err(err) => Err(err),
        }
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    /// Copy `c` from source offset `at`, byte for byte.
    fn push_verbatim(&mut self, c: char, at: usize) {
        let at = offset_of(at);
        for i in 0..offset_of(c.len_utf8()) {
            self.offsets.push(at + i);
        }
        self.value.push(c);
    }

    /// Emit `c` decoded from the escape at source offset `at`.
    fn push_escaped(&mut self, c: char, at: usize) {
        let at = offset_of(at);
        for _ in 0..c.len_utf8() {
            self.offsets.push(at);
        }
        self.value.push(c);
    }
}

/// Parse the escape whose backslash is at `pos` in `text`.
///
/// Returns the decoded character and the offset just past the escape.
fn parse_escape(text: &str, pos: usize) -> Result<(char, usize), DecodeError> {
    let offset = offset_of(pos);
    let rest = text.get(pos + 1..).unwrap_or_default();
    let Some(escape) = rest.chars().next() else {
        return Err(DecodeError::TrailingBackslash { offset });
    };

    let simple = match escape {
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'v' => Some('\u{0B}'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((c, pos + 2));
    }

    match escape {
        '0'..='7' => Ok(parse_octal(rest.as_bytes(), pos)),
        'x' => parse_hex(rest, pos, escape, 2),
        'u' => parse_hex(rest, pos, escape, 4),
        'U' => parse_hex(rest, pos, escape, 8),
        _ => Err(DecodeError::InvalidEscape { offset, escape }),
    }
}

/// Octal escape: `digits` starts at the first digit.
///
/// Up to three digits when the first is `0`-`3`, otherwise up to two, so the
/// value always fits in a byte.
fn parse_octal(digits: &[u8], pos: usize) -> (char, usize) {
    let max = if digits[0] <= b'3' { 3 } else { 2 };
    let count = digits
        .iter()
        .take(max)
        .take_while(|b| matches!(b, b'0'..=b'7'))
        .count();
    let value = digits[..count]
        .iter()
        .fold(0u8, |acc, b| (acc << 3) | (b - b'0'));
    (char::from(value), pos + 1 + count)
}

/// Hex escape with exactly `width` digits after the escape letter.
fn parse_hex(
    rest: &str,
    pos: usize,
    escape: char,
    width: u8,
) -> Result<(char, usize), DecodeError> {
    let offset = offset_of(pos);
    let digits = &rest.as_bytes()[1..];

    if matches!(digits.first(), Some(b'+' | b'-')) {
        return Err(DecodeError::SignedHex { offset, escape });
    }

    let width_usize = usize::from(width);
    let mut code: u64 = 0;
    for i in 0..width_usize {
        let Some(&b) = digits.get(i) else {
            return Err(DecodeError::TruncatedHex {
                offset,
                escape,
                expected: width,
            });
        };
        let Some(digit) = char::from(b).to_digit(16) else {
            let digit = rest[1 + i..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(DecodeError::InvalidHexDigit {
                offset,
                escape,
                digit,
            });
        };
        code = (code << 4) | u64::from(digit);
    }

    let line_break = match code {
        0x0A => Some('\n'),
        0x0D => Some('\r'),
        _ => None,
    };
    if let Some(code) = line_break {
        return Err(DecodeError::LineSeparator { offset, code });
    }

    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or(DecodeError::InvalidCodePoint { offset, code })?;
    Ok((c, pos + 2 + width_usize))
}

/// Convert a byte offset within literal text to the `u32` offset space.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "literal text is bounded by u32 offsets, like every Span"
)]
fn offset_of(pos: usize) -> u32 {
    pos as u32
}

#[cfg(test)]
mod tests;
