//! Basic text normalization.
//!
//! One cleaning pass over the raw bytes (drop controls and replacement
//! noise, collapse whitespace, isolate CJK ideographs), then a whitespace
//! split, then per-word lowering/accent-stripping and punctuation
//! isolation. Sub-words are fed to a caller-supplied sink that can stop
//! the walk early once its output budget is reached.

use crate::charclass::{is_cjk, is_control, is_punctuation, is_whitespace};
use crate::folding::Folder;
use crate::utf8::Codepoints;

pub struct Normalizer {
    lower: bool,
    cjk: bool,
    folder: Folder,
    // Per-codepoint replacements for the Latin-1 fast path.
    latin1: Vec<String>,
}

impl Normalizer {
    pub fn new(lower: bool, cjk: bool) -> Self {
        let folder = Folder::new();
        let latin1 = if lower {
            (0u32..256)
                .map(|cp| {
                    let mut s = String::new();
                    folder.fold_into(char::from_u32(cp).unwrap(), &mut s);
                    s
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            lower,
            cjk,
            folder,
            latin1,
        }
    }

    /// Cleaning pass: drop noise, collapse whitespace to single spaces,
    /// isolate CJK ideographs with spaces.
    ///
    /// Runs of emitted spaces collapse so the pass is idempotent; the
    /// whitespace split downstream is insensitive to run length.
    pub fn clean(&self, text: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(bytes.len());
        for scalar in Codepoints::new(bytes) {
            let cp = scalar.value;
            if cp == 0 || cp == 0xFFFD || cp == 0x2028 || cp == 0x2029 || is_control(cp) {
                continue;
            }
            if is_whitespace(cp) {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
                continue;
            }
            let piece = &text[scalar.start..scalar.start + scalar.len];
            if self.cjk && is_cjk(cp) {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(piece);
                out.push(' ');
                continue;
            }
            out.push_str(piece);
        }
        out
    }

    /// Lower/fold one word into `out`.
    fn lower_into(&self, word: &str, out: &mut String) {
        if word.is_ascii() {
            out.push_str(&word.to_ascii_lowercase());
            return;
        }
        if word.chars().all(|ch| (ch as u32) < 256) {
            for ch in word.chars() {
                out.push_str(&self.latin1[ch as usize]);
            }
            return;
        }
        for ch in word.chars() {
            self.folder.fold_into(ch, out);
        }
    }

    /// Punctuation split: runs of non-punctuation become one sub-word,
    /// every punctuation codepoint stands alone. Returns false when the
    /// sink stopped the walk.
    fn split_punct(&self, word: &str, sink: &mut impl FnMut(&str) -> bool) -> bool {
        if !word.chars().any(|ch| is_punctuation(ch as u32)) {
            return sink(word);
        }
        let mut run_start = 0usize;
        for (i, ch) in word.char_indices() {
            if is_punctuation(ch as u32) {
                if i > run_start && !sink(&word[run_start..i]) {
                    return false;
                }
                if !sink(&word[i..i + ch.len_utf8()]) {
                    return false;
                }
                run_start = i + ch.len_utf8();
            }
        }
        if run_start < word.len() {
            return sink(&word[run_start..]);
        }
        true
    }

    /// Run the full pipeline, feeding each sub-word to `sink` in input
    /// order. The sink returns false to stop early (budget exhausted).
    pub fn for_each_subword(&self, text: &str, mut sink: impl FnMut(&str) -> bool) {
        let cleaned = self.clean(text);
        let mut scratch = String::new();
        for word in cleaned.split([' ', '\t', '\n', '\r']) {
            if word.is_empty() {
                continue;
            }
            let word = if self.lower {
                scratch.clear();
                self.lower_into(word, &mut scratch);
                scratch.as_str()
            } else {
                word
            };
            if !self.split_punct(word, &mut sink) {
                return;
            }
        }
    }

    /// Collect the sub-words of `text`. Test and introspection helper.
    pub fn subwords(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.for_each_subword(text, |sw| {
            out.push(sw.to_string());
            true
        });
        out
    }
}
