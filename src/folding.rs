//! Accent stripping and case folding.
//!
//! The folder consults a compiled codepoint map first (parsed from an
//! embedded `0xHHHH 0xHHHH` table), then falls back to NFKD decomposition
//! with combining marks dropped and the survivors lowercased. ASCII `A-Z`
//! shortcuts straight to `a-z`.

use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fast-path fold mappings for Latin-1 Supplement and Latin Extended-A.
const LATIN_FOLD_TABLE: &str = include_str!("data/latin_fold.txt");

pub struct Folder {
    map: HashMap<char, char>,
}

impl Folder {
    pub fn new() -> Self {
        let map = parse_fold_table(LATIN_FOLD_TABLE);
        log::debug!("compiled fold table: {} entries", map.len());
        Self { map }
    }

    /// Fold one codepoint, appending the replacement to `out`.
    ///
    /// Characters with no replacement (already-lowercase ASCII, symbols,
    /// CJK) pass through unchanged.
    pub fn fold_into(&self, ch: char, out: &mut String) {
        if ch.is_ascii() {
            out.push(ch.to_ascii_lowercase());
            return;
        }
        if let Some(&mapped) = self.map.get(&ch) {
            out.push(mapped);
            return;
        }
        for decomposed in std::iter::once(ch).nfkd() {
            if is_combining_mark(decomposed) {
                continue;
            }
            for lowered in decomposed.to_lowercase() {
                out.push(lowered);
            }
        }
    }

    /// Fold a whole string.
    pub fn fold(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            self.fold_into(ch, &mut out);
        }
        out
    }
}

impl Default for Folder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_fold_table(table: &str) -> HashMap<char, char> {
    let mut map = HashMap::new();
    for line in table.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(src), Some(dst)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Some(src), Some(dst)) = (parse_hex_char(src), parse_hex_char(dst)) else {
            continue;
        };
        map.insert(src, dst);
    }
    map
}

fn parse_hex_char(field: &str) -> Option<char> {
    let hex = field.strip_prefix("0x").or_else(|| field.strip_prefix("0X"))?;
    let cp = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(cp)
}
