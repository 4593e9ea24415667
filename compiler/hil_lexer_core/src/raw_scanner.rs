//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! The scanner operates on a sentinel-terminated [`Cursor`] and produces
//! [`RawToken`] values. It does not build an expression tree or validate
//! escapes: it only needs to recognize token boundaries well enough that
//! `${`, the `}` that closes it, and end of input are reported exactly.
//!
//! # Design
//!
//! Main dispatch covers all 256 byte values. Each arm calls a focused method
//! that advances the cursor and returns `RawToken { tag, len }`. The sentinel
//! byte (`0x00`) naturally dispatches to `eof()`.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

/// Nesting state of a quoted string scan.
///
/// Strings may contain interpolations, whose expressions may contain strings
/// again. An explicit stack keeps pathological nesting off the call stack.
#[derive(Clone, Copy, Debug)]
enum StringFrame {
    /// Inside string text.
    Text,
    /// Inside `${ ... }` within a string, with the count of open `{`.
    Interpolation { braces: u32 },
}

/// Raw scanner over HIL expression text.
///
/// Produces one token at a time as a `(tag, length)` pair.
/// Error conditions are encoded as `RawTag` variants, not as `Result::Err`.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
    /// One entry per open `${`, counting plain `{` opened inside it.
    /// A `}` closes the interpolation only when the top entry is 0.
    brace_depth: Vec<u32>,
}

impl<'a> RawScanner<'a> {
    /// Create a new scanner from a cursor.
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self {
            cursor,
            brace_depth: Vec::new(),
        }
    }

    /// Byte offset where the next token starts.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` with `len == 0` when the source is exhausted.
    /// Subsequent calls after EOF continue to return `Eof`.
    #[inline]
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        match self.cursor.current() {
            0 => self.eof(start),
            b' ' | b'\t' | b'\r' | b'\n' => self.whitespace(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' => self.string(start),
            b'$' => self.dollar(start),
            b'{' => self.left_brace(start),
            b'}' => self.right_brace(start),
            b'+' => self.single(start, RawTag::Plus),
            b'-' => self.single(start, RawTag::Minus),
            b'*' => self.single(start, RawTag::Star),
            b'/' => self.single(start, RawTag::Slash),
            b'%' => self.single(start, RawTag::Percent),
            b'?' => self.single(start, RawTag::Question),
            b':' => self.single(start, RawTag::Colon),
            b'.' => self.single(start, RawTag::Dot),
            b',' => self.single(start, RawTag::Comma),
            b'(' => self.single(start, RawTag::LeftParen),
            b')' => self.single(start, RawTag::RightParen),
            b'[' => self.single(start, RawTag::LeftBracket),
            b']' => self.single(start, RawTag::RightBracket),
            b'!' => self.one_or_two(start, b'=', RawTag::Bang, RawTag::BangEqual),
            b'<' => self.one_or_two(start, b'=', RawTag::Less, RawTag::LessEqual),
            b'>' => self.one_or_two(start, b'=', RawTag::Greater, RawTag::GreaterEqual),
            b'=' => self.one_or_two(start, b'=', RawTag::InvalidByte, RawTag::EqualEqual),
            b'&' => self.one_or_two(start, b'&', RawTag::InvalidByte, RawTag::AndAnd),
            b'|' => self.one_or_two(start, b'|', RawTag::InvalidByte, RawTag::OrOr),
            // Remaining punctuation, control bytes, DEL, and non-ASCII bytes
            1..=8
            | 11..=12
            | 14..=31
            | b'#'
            | b'\''
            | b';'
            | b'@'
            | b'\\'
            | b'^'
            | b'`'
            | b'~'
            | 127..=255 => self.invalid(start),
        }
    }

    #[inline]
    fn token(&self, tag: RawTag, start: u32) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    // --- EOF ---

    fn eof(&mut self, start: u32) -> RawToken {
        if self.cursor.is_eof() {
            RawToken {
                tag: RawTag::Eof,
                len: 0,
            }
        } else {
            self.cursor.advance();
            self.token(RawTag::InteriorNull, start)
        }
    }

    // --- Trivia ---

    fn whitespace(&mut self, start: u32) -> RawToken {
        self.cursor.eat_whitespace();
        self.token(RawTag::Whitespace, start)
    }

    // --- Identifiers & numbers ---

    fn identifier(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        self.token(RawTag::Ident, start)
    }

    fn number(&mut self, start: u32) -> RawToken {
        let first = self.cursor.current();
        self.cursor.advance();

        if first == b'0'
            && matches!(self.cursor.current(), b'x' | b'X')
            && self.cursor.peek().is_ascii_hexdigit()
        {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_hexdigit());
            return self.token(RawTag::Number, start);
        }

        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        if matches!(self.cursor.current(), b'e' | b'E') {
            self.eat_exponent();
        }
        self.token(RawTag::Number, start)
    }

    /// Consume `e[+-]digits` only when digits actually follow.
    fn eat_exponent(&mut self) {
        let mut probe = self.cursor;
        probe.advance(); // 'e' / 'E'
        if matches!(probe.current(), b'+' | b'-') {
            probe.advance();
        }
        if probe.current().is_ascii_digit() {
            probe.eat_while(|b| b.is_ascii_digit());
            self.cursor = probe;
        }
    }

    // --- Operators & delimiters ---

    #[inline]
    fn single(&mut self, start: u32, tag: RawTag) -> RawToken {
        self.cursor.advance();
        self.token(tag, start)
    }

    /// Scan a one-byte token, or a two-byte token when followed by `second`.
    fn one_or_two(&mut self, start: u32, second: u8, one: RawTag, two: RawTag) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == second {
            self.cursor.advance();
            return self.token(two, start);
        }
        self.token(one, start)
    }

    fn dollar(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'{' {
            self.cursor.advance();
            self.brace_depth.push(0);
            return self.token(RawTag::InterpolationStart, start);
        }
        self.token(RawTag::Dollar, start)
    }

    fn left_brace(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if let Some(depth) = self.brace_depth.last_mut() {
            *depth += 1;
        }
        self.token(RawTag::LeftBrace, start)
    }

    fn right_brace(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.brace_depth.last_mut() {
            Some(depth) if *depth > 0 => {
                *depth -= 1;
                self.token(RawTag::RightBrace, start)
            }
            Some(_) => {
                self.brace_depth.pop();
                self.token(RawTag::InterpolationEnd, start)
            }
            // No interpolation open: a stray `}` is still reported as an
            // interpolation end so the caller can resynchronize on it.
            None => self.token(RawTag::InterpolationEnd, start),
        }
    }

    // --- String literals ---

    /// Scan a double-quoted string, including any `${ ... }` inside it.
    ///
    /// Strings may span lines. A string still open at EOF produces
    /// `UnterminatedString` covering the rest of the source.
    fn string(&mut self, start: u32) -> RawToken {
        self.cursor.advance(); // consume opening '"'
        let mut stack = vec![StringFrame::Text];
        while let Some(frame) = stack.last_mut() {
            match frame {
                StringFrame::Text => match self.cursor.skip_to_string_delim() {
                    b'"' => {
                        self.cursor.advance();
                        stack.pop();
                    }
                    b'\\' => {
                        self.cursor.advance(); // consume '\'
                        if !self.cursor.is_eof() {
                            self.cursor.advance_char(); // skip escaped char
                        }
                    }
                    b'$' => {
                        self.cursor.advance();
                        if self.cursor.current() == b'{' {
                            self.cursor.advance();
                            stack.push(StringFrame::Interpolation { braces: 0 });
                        }
                    }
                    _ => return self.token(RawTag::UnterminatedString, start),
                },
                StringFrame::Interpolation { braces } => match self.cursor.current() {
                    b'"' => {
                        self.cursor.advance();
                        stack.push(StringFrame::Text);
                    }
                    b'{' => {
                        *braces += 1;
                        self.cursor.advance();
                    }
                    b'}' => {
                        self.cursor.advance();
                        if *braces == 0 {
                            stack.pop();
                        } else {
                            *braces -= 1;
                        }
                    }
                    0 if self.cursor.is_eof() => {
                        return self.token(RawTag::UnterminatedString, start);
                    }
                    _ => self.cursor.advance_char(),
                },
            }
        }
        self.token(RawTag::String, start)
    }

    // --- Error tokens ---

    fn invalid(&mut self, start: u32) -> RawToken {
        self.cursor.advance_char();
        self.token(RawTag::InvalidByte, start)
    }
}

impl Iterator for RawScanner<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        let tok = self.next_token();
        if tok.tag == RawTag::Eof {
            None
        } else {
            Some(tok)
        }
    }
}

/// Returns `true` if `b` continues an identifier.
///
/// HIL identifiers may contain dashes (`count-index`, `aws-region`).
#[inline]
fn is_ident_continue(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-')
}

/// Convenience function: tokenize a source string and collect all raw tokens.
///
/// Returns a `Vec<RawToken>` containing all tokens except the final `Eof`.
/// For restartable access, construct a `SourceBuffer` + `RawScanner` directly.
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let buf = crate::SourceBuffer::new(source);
    RawScanner::new(buf.cursor()).collect()
}
