//! WordPiece subword segmentation.
//!
//! Greedy longest-match over two automata: an *initial* automaton holding
//! vocabulary entries without the `##` prefix and a *suffix* automaton
//! holding the post-`##` byte strings. Forward scans left-to-right,
//! backward scans right-to-left; when both are enabled an arbitration
//! predicate picks the better segmentation per word.
//!
//! If any position of a word cannot be matched, every token produced for
//! that word is rolled back and a single `[UNK]` is emitted.

use crate::automaton::{Automaton, AutomatonBuilder};
use crate::vocab::{SpecialTokens, Vocabulary};
use crate::TokenId;

/// Words longer than this many bytes collapse to `[UNK]` immediately.
const MAX_WORD_BYTES: usize = 100;

pub struct WordPieceSegmenter {
    initial: Automaton,
    suffix: Automaton,
    unk: TokenId,
    max_word_bytes: usize,
}

impl WordPieceSegmenter {
    /// Build the initial and suffix automata from a vocabulary.
    ///
    /// Special tokens are emitted structurally by the engine and are not
    /// inserted; every other entry lands in exactly one automaton.
    pub fn from_vocab(vocab: &Vocabulary) -> Self {
        let mut initial = AutomatonBuilder::new();
        let mut suffix = AutomatonBuilder::new();
        for (id, token) in vocab.iter() {
            if vocab.is_special(id) {
                continue;
            }
            match token.strip_prefix("##") {
                Some(rest) => suffix.insert(rest.as_bytes(), id),
                None => initial.insert(token.as_bytes(), id),
            }
        }
        Self {
            initial: initial.build(),
            suffix: suffix.build(),
            unk: vocab.specials().unk,
            max_word_bytes: MAX_WORD_BYTES,
        }
    }

    #[inline]
    fn push_capped(out: &mut Vec<TokenId>, id: TokenId, max_out: usize) {
        if out.len() < max_out {
            out.push(id);
        }
    }

    /// Forward greedy segmentation of one word.
    ///
    /// Appends ids to `out`, never growing it past `max_out`. A word that
    /// cannot be fully matched rolls back to the entry checkpoint and
    /// emits `[UNK]`.
    pub fn forward(&self, word: &[u8], out: &mut Vec<TokenId>, max_out: usize) {
        if word.is_empty() {
            return;
        }
        if word.len() > self.max_word_bytes {
            Self::push_capped(out, self.unk, max_out);
            return;
        }
        let checkpoint = out.len();
        let mut start = 0usize;
        while start < word.len() {
            let automaton = if start == 0 { &self.initial } else { &self.suffix };
            let (len, id) = automaton.search(word, start);
            if id < 0 {
                out.truncate(checkpoint);
                Self::push_capped(out, self.unk, max_out);
                return;
            }
            Self::push_capped(out, id as TokenId, max_out);
            start += len;
        }
    }

    /// Backward segmentation of one word.
    ///
    /// Scans right-to-left: at each position the longest span ending there
    /// that an automaton consumes exactly is accepted, initial-automaton
    /// candidates first (span start 0). Matches accumulate in `stack` and
    /// are emitted left-to-right.
    pub fn backward(
        &self,
        word: &[u8],
        out: &mut Vec<TokenId>,
        max_out: usize,
        stack: &mut Vec<TokenId>,
    ) {
        if word.is_empty() {
            return;
        }
        if word.len() > self.max_word_bytes {
            Self::push_capped(out, self.unk, max_out);
            return;
        }
        stack.clear();
        let mut pos = word.len();
        while pos > 0 {
            let mut matched = false;
            for i in 0..pos {
                let automaton = if i == 0 { &self.initial } else { &self.suffix };
                let (len, id) = automaton.search(&word[i..pos], 0);
                if id >= 0 && len == pos - i {
                    stack.push(id as TokenId);
                    pos = i;
                    matched = true;
                    break;
                }
            }
            if !matched {
                Self::push_capped(out, self.unk, max_out);
                return;
            }
        }
        for &id in stack.iter().rev() {
            Self::push_capped(out, id, max_out);
        }
    }

    pub fn unk_id(&self) -> TokenId {
        self.unk
    }
}

/// Arbitration between a forward and a backward segmentation.
///
/// Returns true when the forward ids win. Equal segmentations prefer
/// forward. Otherwise both sequences are reduced to their non-special
/// ids, sorted ascending: the sequence with the smaller minimum wins
/// (absence of non-special ids counts as infinite, so an `[UNK]`-only
/// reading loses to any real split), and equal minima fall through to a
/// lexicographic comparison where forward wins ties.
pub fn prefer_forward(forward: &[TokenId], backward: &[TokenId], specials: SpecialTokens) -> bool {
    if forward == backward {
        return true;
    }
    let filtered_sorted = |ids: &[TokenId]| {
        let mut kept: Vec<TokenId> = ids
            .iter()
            .copied()
            .filter(|&id| {
                id != specials.pad && id != specials.unk && id != specials.cls && id != specials.sep
            })
            .collect();
        kept.sort_unstable();
        kept
    };
    let f = filtered_sorted(forward);
    let b = filtered_sorted(backward);
    match (f.first(), b.first()) {
        (Some(a), Some(c)) if a != c => a < c,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        _ => f <= b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(extra: &[&str]) -> Vocabulary {
        let mut tokens = vec![
            "[PAD]".to_string(),
            "[UNK]".to_string(),
            "[CLS]".to_string(),
            "[SEP]".to_string(),
        ];
        tokens.extend(extra.iter().map(|s| s.to_string()));
        Vocabulary::from_tokens(tokens).unwrap()
    }

    fn specials() -> SpecialTokens {
        SpecialTokens {
            pad: 0,
            unk: 1,
            cls: 2,
            sep: 3,
        }
    }

    #[test]
    fn test_whole_word_single_id() {
        let v = vocab(&["hello", "##lo"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let mut out = Vec::new();
        seg.forward(b"hello", &mut out, usize::MAX);
        assert_eq!(out, vec![4]);
    }

    #[test]
    fn test_every_initial_entry_matches_itself() {
        let words = ["hello", "world", ",", "!", "ca", "able", "世"];
        let v = vocab(&words);
        let seg = WordPieceSegmenter::from_vocab(&v);
        for word in words {
            let id = v.get(word).unwrap();
            let mut out = Vec::new();
            seg.forward(word.as_bytes(), &mut out, usize::MAX);
            assert_eq!(out, vec![id], "word {word}");
        }
    }

    #[test]
    fn test_forward_split() {
        let v = vocab(&["un", "##affable", "##aff", "##able"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let mut out = Vec::new();
        seg.forward(b"unaffable", &mut out, usize::MAX);
        // Longest suffix match wins: ##affable over ##aff + ##able.
        assert_eq!(out, vec![4, 5]);
    }

    #[test]
    fn test_forward_unmatched_rolls_back() {
        let v = vocab(&["un", "##aff"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let mut out = vec![99];
        seg.forward(b"unaffable", &mut out, usize::MAX);
        assert_eq!(out, vec![99, 1]);
    }

    #[test]
    fn test_oversized_word_is_unk() {
        let v = vocab(&["a"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let long = vec![b'a'; 101];
        let mut out = Vec::new();
        seg.forward(&long, &mut out, usize::MAX);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_forward_respects_cap() {
        let v = vocab(&["a", "##a"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let mut out = Vec::new();
        seg.forward(b"aaaa", &mut out, 2);
        assert_eq!(out, vec![4, 5]);
    }

    #[test]
    fn test_backward_matches_forward_on_simple_words() {
        let v = vocab(&["play", "##ing"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let (mut f, mut b, mut stack) = (Vec::new(), Vec::new(), Vec::new());
        seg.forward(b"playing", &mut f, usize::MAX);
        seg.backward(b"playing", &mut b, usize::MAX, &mut stack);
        assert_eq!(f, vec![4, 5]);
        assert_eq!(b, f);
    }

    #[test]
    fn test_backward_recovers_where_forward_fails() {
        // Forward greedily takes "ab" and strands "le"; backward peels
        // "##ble" off the right and leaves "a".
        let v = vocab(&["a", "ab", "##ble"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let (mut f, mut b, mut stack) = (Vec::new(), Vec::new(), Vec::new());
        seg.forward(b"able", &mut f, usize::MAX);
        seg.backward(b"able", &mut b, usize::MAX, &mut stack);
        assert_eq!(f, vec![1]);
        assert_eq!(b, vec![4, 6]);
    }

    #[test]
    fn test_backward_unmatched_is_unk() {
        let v = vocab(&["##ble"]);
        let seg = WordPieceSegmenter::from_vocab(&v);
        let (mut b, mut stack) = (Vec::new(), Vec::new());
        seg.backward(b"xble", &mut b, usize::MAX, &mut stack);
        assert_eq!(b, vec![1]);
    }

    #[test]
    fn test_prefer_equal_is_forward() {
        assert!(prefer_forward(&[4, 5], &[4, 5], specials()));
    }

    #[test]
    fn test_prefer_split_over_unk() {
        // [UNK] filters to nothing and loses to a real split.
        assert!(!prefer_forward(&[1], &[4, 6], specials()));
        assert!(prefer_forward(&[4, 6], &[1], specials()));
    }

    #[test]
    fn test_prefer_smaller_min() {
        assert!(prefer_forward(&[4, 9], &[5, 6], specials()));
        assert!(!prefer_forward(&[7, 9], &[5, 20], specials()));
    }

    #[test]
    fn test_prefer_prefix_is_smaller() {
        // Same minimum; [4,5] is a proper prefix of [4,5,6] once sorted.
        assert!(prefer_forward(&[5, 4], &[4, 5, 6], specials()));
        assert!(!prefer_forward(&[4, 5, 6], &[5, 4], specials()));
    }

    #[test]
    fn test_prefer_antisymmetric_on_distinct_keys() {
        let cases: &[(&[TokenId], &[TokenId])] = &[
            (&[4], &[5]),
            (&[4, 9], &[4, 8]),
            (&[1, 7], &[6]),
            (&[4, 5], &[4, 5, 6]),
        ];
        for (f, b) in cases {
            assert_ne!(
                prefer_forward(f, b, specials()),
                prefer_forward(b, f, specials()),
                "asymmetry violated for {f:?} vs {b:?}"
            );
        }
    }
}
