//! Splitting literal text into fragments.
//!
//! A fragment is a plain run of text, one escape sequence, or one whole
//! `${ ... }` island. Simple escapes carry their decoded text; everything
//! else carries the raw source text. String literal injection scans only
//! the fragments that begin with `${`.

use std::borrow::Cow;

use hil_ir::Span;

/// One piece of literal text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFragment<'a> {
    /// Byte range of the fragment in the literal text.
    pub span: Span,
    /// Decoded text for simple escapes, raw text otherwise.
    pub text: Cow<'a, str>,
}

impl<'a> TextFragment<'a> {
    fn raw(text: &'a str, start: usize, end: usize) -> Self {
        TextFragment {
            span: span_of(start, end),
            text: Cow::Borrowed(text.get(start..end).unwrap_or_default()),
        }
    }

    /// Whether this fragment is an interpolation island.
    pub fn is_interpolation(&self) -> bool {
        self.text.starts_with("${")
    }
}

/// Split `text` into fragments.
///
/// With `quoted`, the first character is an opening quote and is skipped;
/// a matching final character is treated as the closing quote and excluded.
/// With `interpolations`, a `${` not preceded by `$` starts an island that
/// runs to its balancing `}` by brace counting, or to the end of the text.
pub fn text_fragments(text: &str, interpolations: bool, quoted: bool) -> Vec<TextFragment<'_>> {
    let mut fragments = Vec::new();
    let Some(first) = text.chars().next() else {
        return fragments;
    };

    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut pos = if quoted { first.len_utf8() } else { 0 };
    let mut plain_start = pos;

    while pos < len {
        let b = bytes[pos];

        if interpolations
            && b == b'$'
            && bytes.get(pos + 1) == Some(&b'{')
            && (pos == 0 || bytes[pos - 1] != b'$')
        {
            if plain_start != pos {
                fragments.push(TextFragment::raw(text, plain_start, pos));
            }
            let start = pos;
            pos += 2;
            let mut braces = 1u32;
            while pos < len && braces > 0 {
                match bytes[pos] {
                    b'{' => braces += 1,
                    b'}' => braces -= 1,
                    _ => {}
                }
                pos += 1;
            }
            fragments.push(TextFragment::raw(text, start, pos));
            plain_start = pos;
            continue;
        }

        if b != b'\\' {
            pos += 1;
            continue;
        }

        if plain_start != pos {
            fragments.push(TextFragment::raw(text, plain_start, pos));
        }
        let Some(next) = text.get(pos + 1..).and_then(|rest| rest.chars().next()) else {
            fragments.push(TextFragment {
                span: span_of(pos, pos + 1),
                text: Cow::Borrowed("\\"),
            });
            plain_start = len;
            break;
        };

        let fragment = match next {
            '"' | '\\' | '/' | 'a' | 'b' | 'f' | 'n' | 'v' | 'r' | 't' => TextFragment {
                span: span_of(pos, pos + 2),
                text: Cow::Borrowed(simple_escape_text(next)),
            },
            'u' => TextFragment::raw(text, pos, hex_run_end(bytes, pos + 2, 4)),
            'U' => TextFragment::raw(text, pos, hex_run_end(bytes, pos + 2, 8)),
            'X' => TextFragment::raw(text, pos, hex_run_end(bytes, pos + 2, 2)),
            '0'..='7' => {
                // the first digit counts toward the three
                let digits = bytes[pos + 1..]
                    .iter()
                    .take(3)
                    .take_while(|b| matches!(b, b'0'..=b'7'))
                    .count();
                TextFragment::raw(text, pos, pos + 1 + digits)
            }
            _ => TextFragment::raw(text, pos, pos + 1 + next.len_utf8()),
        };
        pos = fragment.span.end as usize;
        fragments.push(fragment);
        plain_start = pos;
    }

    let content_end = match text.chars().next_back() {
        Some(last) if quoted && last == first => len - last.len_utf8(),
        _ => len,
    };
    if plain_start < content_end {
        fragments.push(TextFragment::raw(text, plain_start, content_end));
    }
    fragments
}

/// Decoded text of a simple escape character.
fn simple_escape_text(escape: char) -> &'static str {
    match escape {
        '"' => "\"",
        '\\' => "\\",
        '/' => "/",
        'a' => "\u{07}",
        'b' => "\u{08}",
        'f' => "\u{0C}",
        'n' => "\n",
        'v' => "\u{0B}",
        'r' => "\r",
        _ => "\t",
    }
}

/// End of a run of at most `max` hex digits starting at `from`.
fn hex_run_end(bytes: &[u8], from: usize, max: usize) -> usize {
    from + bytes
        .get(from..)
        .unwrap_or_default()
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_hexdigit())
        .count()
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "literal text is bounded by u32 offsets, like every Span"
)]
fn span_of(start: usize, end: usize) -> Span {
    Span::new(start as u32, end as u32)
}
