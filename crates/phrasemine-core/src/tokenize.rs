//! Tokenization of raw document bytes.
//!
//! A token is a maximal run of ASCII alphanumeric code points, lowercased.
//! Every other code point is a delimiter, including all non-ASCII input.
//! UTF-16 input is recognized by its byte-order mark and each 16-bit code
//! unit is judged independently, so surrogates delimit too.

/// Tokenize a byte string.
///
/// Only ASCII alphanumeric bytes survive into tokens; multi-byte UTF-8
/// sequences fall apart into delimiters by construction.
pub fn tokenize(bytes: &[u8]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for &b in bytes {
        if b.is_ascii_alphanumeric() {
            current.push(b.to_ascii_lowercase() as char);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Tokenize a sequence of 16-bit code units.
///
/// A unit contributes to a token only when it is an ASCII alphanumeric code
/// point; everything else, surrogate halves included, delimits.
pub fn tokenize_utf16(units: &[u16]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for &u in units {
        if u < 0x80 && (u as u8).is_ascii_alphanumeric() {
            current.push((u as u8).to_ascii_lowercase() as char);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Tokenize a whole document, dispatching on a UTF-16 byte-order mark.
///
/// `FF FE` selects little-endian and `FE FF` big-endian decoding of the
/// remaining byte pairs; an odd trailing byte is dropped. Without a BOM the
/// bytes go through [`tokenize`] directly.
pub fn tokenize_document(bytes: &[u8]) -> Vec<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => tokenize_utf16(&decode_units(rest, u16::from_le_bytes)),
        [0xFE, 0xFF, rest @ ..] => tokenize_utf16(&decode_units(rest, u16::from_be_bytes)),
        _ => tokenize(bytes),
    }
}

fn decode_units(bytes: &[u8], decode: fn([u8; 2]) -> u16) -> Vec<u16> {
    // chunks_exact drops the odd trailing byte
    bytes
        .chunks_exact(2)
        .map(|pair| decode([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        assert_eq!(
            tokenize(b"Hello, world! 42\n"),
            vec!["hello", "world", "42"]
        );
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize(b"").is_empty());
        assert!(tokenize(b" \t\n...").is_empty());
        assert!(tokenize_utf16(&[]).is_empty());
    }

    #[test]
    fn lowercases_tokens() {
        assert_eq!(tokenize(b"MiXeD CaSe"), vec!["mixed", "case"]);
    }

    #[test]
    fn non_ascii_bytes_delimit() {
        // "caf\u{e9}s" in UTF-8: the two-byte e-acute splits the word
        assert_eq!(tokenize("caf\u{e9}s".as_bytes()), vec!["caf", "s"]);
    }

    #[test]
    fn digits_and_letters_mix() {
        assert_eq!(tokenize(b"abc123 4d"), vec!["abc123", "4d"]);
    }

    #[test]
    fn utf16_le_bom_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "test".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(tokenize_document(&bytes), vec!["test"]);
    }

    #[test]
    fn utf16_be_bom_swaps_bytes() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "big endian".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(tokenize_document(&bytes), vec!["big", "endian"]);
    }

    #[test]
    fn utf16_odd_trailing_byte_is_dropped() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "ok".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes.push(b'x');
        assert_eq!(tokenize_document(&bytes), vec!["ok"]);
    }

    #[test]
    fn utf16_non_ascii_units_delimit() {
        // 'a', U+0151, 'b' as little-endian units
        let bytes = [0xFF, 0xFE, b'a', 0x00, 0x51, 0x01, b'b', 0x00];
        assert_eq!(tokenize_document(&bytes), vec!["a", "b"]);
    }

    #[test]
    fn no_bom_means_raw_bytes() {
        assert_eq!(tokenize_document(b"plain text"), vec!["plain", "text"]);
    }

    #[test]
    fn retokenizing_joined_tokens_is_identity() {
        let tokens = tokenize(b"The quick-brown fox, 42 times!");
        let joined = tokens.join(" ");
        assert_eq!(tokenize(joined.as_bytes()), tokens);
    }
}
