use super::*;
use pretty_assertions::assert_eq;

fn decoded(text: &str) -> String {
    match decode(text, false) {
        Ok(d) => d.into_string(),
        Err(err) => panic!("decode({text:?}) failed: {err}"),
    }
}

fn decode_err(text: &str) -> DecodeError {
    match decode(text, false) {
        Ok(d) => panic!("decode({text:?}) unexpectedly produced {:?}", d.as_str()),
        Err(err) => err,
    }
}

// === Fast path ===

#[test]
fn no_backslash_is_identity() {
    let d = decode("hello ${world}", false).unwrap();
    assert_eq!(d.as_str(), "hello ${world}");
    assert_eq!(d.offsets(), (0..=14).collect::<Vec<u32>>().as_slice());
}

#[test]
fn empty_text() {
    let d = decode("", true).unwrap();
    assert!(d.is_empty());
    assert_eq!(d.offsets(), &[0]);
}

#[test]
fn multibyte_identity_offsets() {
    let d = decode("\u{e9}x", false).unwrap();
    assert_eq!(d.offsets(), &[0, 1, 2, 3]);
}

// === Simple escapes ===

#[test]
fn newline_escape_offsets() {
    let d = decode(r"a\nb", false).unwrap();
    assert_eq!(d.as_str(), "a\nb");
    assert_eq!(d.offsets(), &[0, 1, 3, 4]);
    assert_eq!(d.source_offset(1), Some(1));
    assert_eq!(d.source_offset(2), Some(3));
    assert_eq!(d.source_offset(3), Some(4));
    assert_eq!(d.source_offset(4), None);
}

#[test]
fn all_simple_escapes() {
    assert_eq!(
        decoded(r#"\a\b\f\n\t\r\v\\\""#),
        "\u{07}\u{08}\u{0C}\n\t\r\u{0B}\\\""
    );
}

#[test]
fn forward_slash_is_not_an_escape() {
    assert_eq!(
        decode_err(r"a\/b"),
        DecodeError::InvalidEscape {
            offset: 1,
            escape: '/'
        }
    );
}

// === Octal ===

#[test]
fn octal_three_digits() {
    assert_eq!(decoded(r"\101"), "A");
}

#[test]
fn octal_stops_after_three_digits() {
    assert_eq!(decoded(r"\1019"), "A9");
    assert_eq!(decoded(r"\1017"), "A7");
}

#[test]
fn octal_short_forms() {
    assert_eq!(decoded(r"\7"), "\u{07}");
    assert_eq!(decoded(r"\0"), "\0");
    assert_eq!(decoded(r"\12x"), "\nx");
}

#[test]
fn octal_high_first_digit_takes_two() {
    // `\477` is `\47` (`'`) followed by a literal `7`.
    assert_eq!(decoded(r"\477"), "'7");
}

#[test]
fn octal_max_byte() {
    assert_eq!(decoded(r"\377"), "\u{FF}");
    let d = decode(r"\377", false).unwrap();
    // U+00FF is two bytes; both map to the backslash.
    assert_eq!(d.offsets(), &[0, 0, 4]);
}

// === Hex ===

#[test]
fn hex_escapes() {
    assert_eq!(decoded(r"\x41"), "A");
    assert_eq!(decoded(r"\u00e9"), "\u{e9}");
    assert_eq!(decoded(r"\U0001F600"), "\u{1F600}");
}

#[test]
fn hex_digits_beyond_width_are_literal() {
    assert_eq!(decoded(r"\x414"), "A4");
}

#[test]
fn hex_escape_offsets() {
    let d = decode(r"x\u00e9y", false).unwrap();
    assert_eq!(d.as_str(), "x\u{e9}y");
    assert_eq!(d.offsets(), &[0, 1, 1, 7, 8]);
}

#[test]
fn hex_sign_is_rejected() {
    assert_eq!(
        decode_err(r"\x+1"),
        DecodeError::SignedHex {
            offset: 0,
            escape: 'x'
        }
    );
    assert_eq!(
        decode_err(r"ab\u-123"),
        DecodeError::SignedHex {
            offset: 2,
            escape: 'u'
        }
    );
}

#[test]
fn hex_truncated() {
    assert_eq!(
        decode_err(r"\u12"),
        DecodeError::TruncatedHex {
            offset: 0,
            escape: 'u',
            expected: 4
        }
    );
    assert!(matches!(decode_err(r"\x"), DecodeError::TruncatedHex { .. }));
}

#[test]
fn hex_non_digit() {
    assert_eq!(
        decode_err(r"\x4g"),
        DecodeError::InvalidHexDigit {
            offset: 0,
            escape: 'x',
            digit: 'g'
        }
    );
}

#[test]
fn hex_line_breaks_are_rejected() {
    assert_eq!(
        decode_err(r"\x0a"),
        DecodeError::LineSeparator {
            offset: 0,
            code: '\n'
        }
    );
    assert_eq!(
        decode_err(r"\u000D"),
        DecodeError::LineSeparator {
            offset: 0,
            code: '\r'
        }
    );
}

#[test]
fn octal_line_break_is_allowed() {
    assert_eq!(decoded(r"\12"), "\n");
}

#[test]
fn surrogate_and_out_of_range_code_points() {
    assert_eq!(
        decode_err(r"\uD800"),
        DecodeError::InvalidCodePoint {
            offset: 0,
            code: 0xD800
        }
    );
    assert_eq!(
        decode_err(r"\UFFFFFFFF"),
        DecodeError::InvalidCodePoint {
            offset: 0,
            code: 0xFFFF_FFFF
        }
    );
}

// === Failures ===

#[test]
fn unknown_escape_fails() {
    assert_eq!(
        decode_err(r"\q"),
        DecodeError::InvalidEscape {
            offset: 0,
            escape: 'q'
        }
    );
}

#[test]
fn trailing_backslash_fails() {
    assert_eq!(
        decode_err("abc\\"),
        DecodeError::TrailingBackslash { offset: 3 }
    );
}

#[test]
fn error_offset_accessor() {
    assert_eq!(decode_err(r"ab\q").offset(), 2);
    assert_eq!(decode_err(r"\x+1").offset(), 0);
}

#[test]
fn error_messages() {
    assert_eq!(
        decode_err(r"\q").to_string(),
        "unknown escape `\\q` at offset 0"
    );
    assert_eq!(
        decode_err(r"\u12").to_string(),
        "`\\u` escape at offset 0 needs 4 hex digits"
    );
}

// === Passthrough ===

#[test]
fn passthrough_copies_interpolation() {
    let d = decode("a${1+1}b", true).unwrap();
    assert_eq!(d.as_str(), "a${1+1}b");
}

#[test]
fn passthrough_skips_escapes_inside() {
    let d = decode(r#"\n${f("\q")}\t"#, true).unwrap();
    assert_eq!(d.as_str(), "\n${f(\"\\q\")}\t");
    assert_eq!(d.source_offset(0), Some(0));
    assert_eq!(d.source_offset(1), Some(2));
}

#[test]
fn passthrough_tracks_nested_braces() {
    let d = decode(r"${ {a = 1} }\n", true).unwrap();
    assert_eq!(d.as_str(), "${ {a = 1} }\n");
}

#[test]
fn without_passthrough_interpolation_escapes_are_decoded() {
    assert_eq!(decoded(r"${\x41}"), "${A}");
    assert!(decode(r#"${f("\q")}"#, false).is_err());
}

#[test]
fn unterminated_passthrough_runs_to_end() {
    let d = decode(r"x${a\q", true).unwrap();
    assert_eq!(d.as_str(), r"x${a\q");
}

// === Lossy decoding ===

#[test]
fn safe_decode_keeps_invalid_escape() {
    let d = safe_decode(r"a\qb\n", false);
    assert_eq!(d.as_str(), "a\\qb\n");
    assert_eq!(d.offsets(), &[0, 1, 2, 3, 4, 6]);
}

#[test]
fn safe_decode_keeps_trailing_backslash() {
    let d = safe_decode("ab\\", false);
    assert_eq!(d.as_str(), "ab\\");
    assert_eq!(d.offsets(), &[0, 1, 2, 3]);
}

#[test]
fn safe_decode_resumes_after_bad_hex() {
    assert_eq!(safe_decode(r"\x+41", false).as_str(), r"\x+41");
    assert_eq!(safe_decode(r"\u12", false).as_str(), r"\u12");
    assert_eq!(safe_decode(r"\x0a!", false).as_str(), r"\x0a!");
}

#[test]
fn safe_decode_matches_decode_on_success() {
    for text in [r"plain", r"a\nb", r"\101\x41\u0041", r"${a}\t"] {
        assert_eq!(safe_decode(text, true), decode(text, true).unwrap());
    }
}

// === Host offsets ===

#[test]
fn offset_in_host_shifts_by_window() {
    let d = decode(r"a\nb", false).unwrap();
    let window = Span::new(10, 14);
    assert_eq!(d.offset_in_host(0, window), Some(10));
    assert_eq!(d.offset_in_host(2, window), Some(13));
    assert_eq!(d.offset_in_host(3, window), Some(14));
    assert_eq!(d.offset_in_host(4, window), None);
}

#[test]
fn offset_in_host_outside_window() {
    let d = decode("abcdef", false).unwrap();
    assert_eq!(d.offset_in_host(5, Span::new(0, 3)), None);
    assert_eq!(d.offset_in_host(3, Span::new(0, 3)), Some(3));
}

#[test]
fn display_and_as_ref() {
    let d = decode(r"x\ty", false).unwrap();
    assert_eq!(d.to_string(), "x\ty");
    assert_eq!(d.as_ref(), "x\ty");
    assert_eq!(d.len(), 3);
}
