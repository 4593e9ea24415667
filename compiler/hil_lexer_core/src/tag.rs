//! Raw token tags produced by the boundary scanner.

/// What a raw token means to the interpolation boundary search.
///
/// The scanner that locates `${ ... }` spans only cares about these four
/// classes; everything else about a token is irrelevant to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// `${` opening an interpolation.
    InterpolationStart,
    /// `}` closing the innermost open interpolation.
    InterpolationEnd,
    /// End of the scanned text.
    Eof,
    /// Any ordinary expression token, trivia, or error token.
    Other,
}

/// Raw token kind.
///
/// Discriminants are grouped into semantic ranges:
/// - 0-15: identifiers and literals
/// - 16-19: interpolation delimiters
/// - 32-63: operators
/// - 80-95: delimiters
/// - 112: trivia
/// - 240-247: errors
/// - 255: EOF
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawTag {
    // === Identifiers & Literals ===
    /// Identifier (`var`, `aws_instance`, `count-index`).
    Ident = 0,
    /// Numeric literal (`42`, `1.5e3`, `0xFF`).
    Number = 1,
    /// Complete double-quoted string, nested interpolations included.
    String = 2,

    // === Interpolation ===
    /// `${`
    InterpolationStart = 16,
    /// `}` that closes an interpolation.
    InterpolationEnd = 17,

    // === Operators ===
    Plus = 32,
    Minus = 33,
    Star = 34,
    Slash = 35,
    Percent = 36,
    Bang = 37,
    BangEqual = 38,
    EqualEqual = 39,
    Less = 40,
    LessEqual = 41,
    Greater = 42,
    GreaterEqual = 43,
    AndAnd = 44,
    OrOr = 45,
    Question = 46,
    Colon = 47,
    Dot = 48,
    Comma = 49,

    // === Delimiters ===
    LeftParen = 80,
    RightParen = 81,
    LeftBracket = 82,
    RightBracket = 83,
    /// `{` of an object literal (not part of `${`).
    LeftBrace = 84,
    /// `}` matching a [`RawTag::LeftBrace`].
    RightBrace = 85,
    /// `$` not followed by `{`.
    Dollar = 86,

    // === Trivia ===
    /// Spaces, tabs, carriage returns and newlines.
    Whitespace = 112,

    // === Errors ===
    /// Byte that starts no HIL token (`=`, `|`, `#`, non-ASCII, ...).
    InvalidByte = 240,
    /// String literal that reaches EOF before its closing `"`.
    UnterminatedString = 241,
    /// Null byte inside the source content.
    InteriorNull = 242,

    // === Control ===
    /// End of input.
    Eof = 255,
}

impl RawTag {
    /// Classify this tag for the interpolation boundary search.
    #[inline]
    pub fn boundary(self) -> Boundary {
        match self {
            RawTag::InterpolationStart => Boundary::InterpolationStart,
            RawTag::InterpolationEnd => Boundary::InterpolationEnd,
            RawTag::Eof => Boundary::Eof,
            _ => Boundary::Other,
        }
    }

    /// The fixed source text of this tag, if it always has the same lexeme.
    pub fn lexeme(self) -> Option<&'static str> {
        let text = match self {
            RawTag::InterpolationStart => "${",
            RawTag::InterpolationEnd | RawTag::RightBrace => "}",
            RawTag::Plus => "+",
            RawTag::Minus => "-",
            RawTag::Star => "*",
            RawTag::Slash => "/",
            RawTag::Percent => "%",
            RawTag::Bang => "!",
            RawTag::BangEqual => "!=",
            RawTag::EqualEqual => "==",
            RawTag::Less => "<",
            RawTag::LessEqual => "<=",
            RawTag::Greater => ">",
            RawTag::GreaterEqual => ">=",
            RawTag::AndAnd => "&&",
            RawTag::OrOr => "||",
            RawTag::Question => "?",
            RawTag::Colon => ":",
            RawTag::Dot => ".",
            RawTag::Comma => ",",
            RawTag::LeftParen => "(",
            RawTag::RightParen => ")",
            RawTag::LeftBracket => "[",
            RawTag::RightBracket => "]",
            RawTag::LeftBrace => "{",
            RawTag::Dollar => "$",
            RawTag::Ident
            | RawTag::Number
            | RawTag::String
            | RawTag::Whitespace
            | RawTag::InvalidByte
            | RawTag::UnterminatedString
            | RawTag::InteriorNull
            | RawTag::Eof => return None,
        };
        Some(text)
    }
}

/// A raw token: tag plus byte length.
///
/// The start offset is the scanner position before the token was produced;
/// see [`RawScanner::pos`](crate::RawScanner::pos).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}
