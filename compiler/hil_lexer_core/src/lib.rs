//! Standalone boundary scanner for HIL (`${ ... }`) expression text.
//!
//! This crate knows just enough of the interpolation language to tell where
//! an interpolation begins and ends: it tokenizes expression text into
//! [`RawToken`]s whose [`RawTag`] can be classified as an interpolation
//! start, an interpolation end, end of input, or anything else. Quoted
//! strings (including `${...}` nested inside them) and object braces are
//! consumed whole so they never close an interpolation early.
//!
//! Scanning is restartable: [`SourceBuffer::cursor_at`] positions a
//! [`Cursor`] at any byte offset, and a fresh [`RawScanner`] starts from
//! there. Callers that resynchronize after a failed attempt build one buffer
//! and restart as often as they need.

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::{tokenize, RawScanner};
pub use source_buffer::SourceBuffer;
pub use tag::{Boundary, RawTag, RawToken};
