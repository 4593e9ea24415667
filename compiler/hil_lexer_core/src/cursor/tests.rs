use crate::SourceBuffer;

// === Basic navigation ===

#[test]
fn current_and_peek() {
    let buf = SourceBuffer::new("${");
    let cursor = buf.cursor();
    assert_eq!(cursor.current(), b'$');
    assert_eq!(cursor.peek(), b'{');
}

#[test]
fn peek_past_end_reads_padding() {
    let buf = SourceBuffer::new("$");
    let cursor = buf.cursor();
    assert_eq!(cursor.peek(), 0);
}

#[test]
fn advance_moves_position() {
    let buf = SourceBuffer::new("abc");
    let mut cursor = buf.cursor();
    cursor.advance();
    assert_eq!(cursor.pos(), 1);
    assert_eq!(cursor.current(), b'b');
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_eof());
}

#[test]
fn empty_source_is_eof() {
    let buf = SourceBuffer::new("");
    let cursor = buf.cursor();
    assert!(cursor.is_eof());
    assert_eq!(cursor.source_len(), 0);
}

// === Eating ===

#[test]
fn eat_while_stops_at_sentinel() {
    let buf = SourceBuffer::new("aaaa");
    let mut cursor = buf.cursor();
    cursor.eat_while(|b| b == b'a');
    assert_eq!(cursor.pos(), 4);
    assert!(cursor.is_eof());
}

#[test]
fn eat_whitespace_includes_newlines() {
    let buf = SourceBuffer::new(" \t\r\n x");
    let mut cursor = buf.cursor();
    cursor.eat_whitespace();
    assert_eq!(cursor.current(), b'x');
    assert_eq!(cursor.pos(), 5);
}

// === UTF-8 ===

#[test]
fn utf8_char_widths() {
    use crate::Cursor;
    assert_eq!(Cursor::utf8_char_width(b'a'), 1);
    assert_eq!(Cursor::utf8_char_width(0xC3), 2);
    assert_eq!(Cursor::utf8_char_width(0xE2), 3);
    assert_eq!(Cursor::utf8_char_width(0xF0), 4);
    // continuation byte
    assert_eq!(Cursor::utf8_char_width(0x80), 1);
}

#[test]
fn advance_char_skips_multibyte() {
    let buf = SourceBuffer::new("\u{e9}x");
    let mut cursor = buf.cursor();
    cursor.advance_char();
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.current(), b'x');
}

#[test]
fn advance_char_from_continuation_byte_moves_one() {
    let buf = SourceBuffer::new("\u{e9}x");
    let mut cursor = buf.cursor_at(1);
    cursor.advance_char();
    assert_eq!(cursor.pos(), 2);
}

// === String delimiters ===

#[test]
fn skip_to_string_delim_finds_quote() {
    let buf = SourceBuffer::new("abc\"def");
    let mut cursor = buf.cursor();
    assert_eq!(cursor.skip_to_string_delim(), b'"');
    assert_eq!(cursor.pos(), 3);
}

#[test]
fn skip_to_string_delim_finds_dollar_and_backslash() {
    let buf = SourceBuffer::new("ab$c\\d");
    let mut cursor = buf.cursor();
    assert_eq!(cursor.skip_to_string_delim(), b'$');
    assert_eq!(cursor.pos(), 2);
    cursor.advance();
    assert_eq!(cursor.skip_to_string_delim(), b'\\');
    assert_eq!(cursor.pos(), 4);
}

#[test]
fn skip_to_string_delim_hits_eof() {
    let buf = SourceBuffer::new("plain text");
    let mut cursor = buf.cursor();
    assert_eq!(cursor.skip_to_string_delim(), 0);
    assert!(cursor.is_eof());
}

mod proptest_cursor {
    use crate::SourceBuffer;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn advance_char_never_passes_source_end(source in "\\PC{0,32}", start in 0u32..40) {
            let buf = SourceBuffer::new(&source);
            let mut cursor = buf.cursor_at(start);
            while !cursor.is_eof() {
                let before = cursor.pos();
                cursor.advance_char();
                prop_assert!(cursor.pos() > before);
                prop_assert!(cursor.pos() <= cursor.source_len());
            }
        }
    }
}
