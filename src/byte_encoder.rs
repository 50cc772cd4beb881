//! GPT-2 byte-level encoding.
//!
//! Byte-level BPE never sees raw bytes: every byte maps to a printable
//! codepoint through a fixed bijection, and decoding inverts it. The
//! table seeds with the printable ranges `0x21-0x7E`, `0xA1-0xAC` and
//! `0xAE-0xFF`; every byte outside those ranges is assigned the next free
//! codepoint from `0x100` upward.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Byte → codepoint table.
pub fn byte_to_char() -> &'static [char; 256] {
    static ENCODER: OnceLock<[char; 256]> = OnceLock::new();
    ENCODER.get_or_init(|| {
        let printable = |b: u32| {
            (0x21..=0x7E).contains(&b) || (0xA1..=0xAC).contains(&b) || (0xAE..=0xFF).contains(&b)
        };
        let mut table = ['\0'; 256];
        let mut next_free = 0x100u32;
        for b in 0u32..256 {
            let cp = if printable(b) {
                b
            } else {
                let cp = next_free;
                next_free += 1;
                cp
            };
            table[b as usize] = char::from_u32(cp).unwrap();
        }
        table
    })
}

/// Codepoint → byte table (the inverse bijection).
pub fn char_to_byte() -> &'static HashMap<char, u8> {
    static DECODER: OnceLock<HashMap<char, u8>> = OnceLock::new();
    DECODER.get_or_init(|| {
        byte_to_char()
            .iter()
            .enumerate()
            .map(|(b, &c)| (c, b as u8))
            .collect()
    })
}

/// Map every byte of `text` to its printable codepoint.
#[must_use]
pub fn encode_bytes(text: &str) -> String {
    let table = byte_to_char();
    text.bytes().map(|b| table[b as usize]).collect()
}

/// Invert the byte encoding. Codepoints outside the table are ignored;
/// the recovered bytes are interpreted as UTF-8.
#[must_use]
pub fn decode_bytes(text: &str) -> String {
    let table = char_to_byte();
    let bytes: Vec<u8> = text.chars().filter_map(|c| table.get(&c).copied()).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijection() {
        let encoder = byte_to_char();
        let mut seen = std::collections::HashSet::new();
        for &c in encoder.iter() {
            assert!(seen.insert(c), "codepoint {c:?} assigned twice");
        }
        assert_eq!(char_to_byte().len(), 256);
    }

    #[test]
    fn test_space_maps_to_g_dot() {
        // Space (0x20) is outside the printable seed and lands on U+0120.
        let encoded = encode_bytes(" ");
        assert_eq!(encoded.chars().next().unwrap() as u32, 0x0120);
    }

    #[test]
    fn test_printable_ascii_identity() {
        assert_eq!(encode_bytes("Hello!"), "Hello!");
    }

    #[test]
    fn test_roundtrip() {
        for text in ["Hello, world!", "tab\tand\nnewline", "mixed 世界 bytes", ""] {
            assert_eq!(decode_bytes(&encode_bytes(text)), text);
        }
    }

    #[test]
    fn test_decode_skips_unmapped() {
        // 世 is not an image of any byte; it is dropped on decode.
        assert_eq!(decode_bytes("a世b"), "ab");
    }
}
