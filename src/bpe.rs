//! Byte-level BPE tokenizer.
//!
//! Pipeline per encode: regex pre-tokenization of the raw text, byte
//! encoding of each piece, then rank-driven pair merging. Each piece is a
//! linked list of byte ranges over its encoded string; adjacent ranges
//! merge in merge-table rank order (ties broken by leftmost position)
//! until no adjacent pair has a rank.

use crate::byte_encoder;
use crate::vocab::BpeVocab;
use crate::{Error, TokenId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::path::Path;
use std::sync::Mutex;

/// GPT-2 pre-tokenization pattern. The trailing-whitespace alternative
/// needs lookahead, hence fancy-regex.
const PRETOKENIZE_PATTERN: &str =
    r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// Pieces already segmented are memoized up to this many entries.
const CACHE_MAX_ENTRIES: usize = 1 << 16;

/// One byte range of a piece during merging (linked list node).
#[derive(Debug, Clone)]
struct Symbol {
    start: usize,
    len: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Adjacent-pair merge candidate.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Bigram {
    left: usize,
    right: usize,
    rank: usize,
}

impl Ord for Bigram {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower rank first, then leftmost occurrence; reversed for the
        // max-heap.
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.left.cmp(&self.left))
    }
}

impl PartialOrd for Bigram {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct BpeTokenizer {
    vocab: BpeVocab,
    // Keyed "left right". Merge tokens come from whitespace-split fields
    // and byte-encoded text never contains a space, so the space-joined
    // key is unambiguous.
    merge_ranks: HashMap<String, usize>,
    pattern: fancy_regex::Regex,
    cache: Mutex<HashMap<String, Vec<TokenId>>>,
}

impl BpeTokenizer {
    pub fn from_files<P: AsRef<Path>>(vocab_path: P, merges_path: P) -> Result<Self, Error> {
        let vocab = BpeVocab::from_file(vocab_path)?;
        let merges = crate::vocab::load_merges(merges_path)?;
        Self::from_parts(vocab, merges)
    }

    pub fn from_parts(vocab: BpeVocab, merges: Vec<(String, String)>) -> Result<Self, Error> {
        let merge_ranks: HashMap<String, usize> = merges
            .into_iter()
            .enumerate()
            .map(|(rank, (left, right))| (format!("{left} {right}"), rank))
            .collect();
        let pattern = fancy_regex::Regex::new(PRETOKENIZE_PATTERN)
            .map_err(|e| Error::Config(format!("cannot compile pre-tokenize pattern: {e}")))?;
        log::debug!(
            "BPE engine ready: {} vocab entries, {} merge rules",
            vocab.len(),
            merge_ranks.len()
        );
        Ok(Self {
            vocab,
            merge_ranks,
            pattern,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Regex pre-tokenization over the raw text.
    ///
    /// Matching runs before byte encoding: the encoded image of a space
    /// is a letter codepoint, so encoding first would fuse
    /// space-separated words into one `\p{L}+` match.
    fn pre_tokenize<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, Error> {
        let mut pieces = Vec::new();
        for m in self.pattern.find_iter(text) {
            let m = m.map_err(|e| {
                Error::TokenizationFailed(format!("pre-tokenization failed: {e}"))
            })?;
            pieces.push(m.as_str());
        }
        Ok(pieces)
    }

    fn rank_of(&self, text: &str, left: &Symbol, right: &Symbol, key: &mut String) -> Option<usize> {
        key.clear();
        key.push_str(&text[left.start..left.start + left.len]);
        key.push(' ');
        key.push_str(&text[right.start..right.start + right.len]);
        self.merge_ranks.get(key.as_str()).copied()
    }

    fn try_add_bigram(
        &self,
        left: usize,
        right: usize,
        text: &str,
        symbols: &[Symbol],
        queue: &mut BinaryHeap<Bigram>,
        key: &mut String,
    ) {
        if symbols[left].len == 0 || symbols[right].len == 0 {
            return;
        }
        if let Some(rank) = self.rank_of(text, &symbols[left], &symbols[right], key) {
            queue.push(Bigram { left, right, rank });
        }
    }

    /// Merge loop over one byte-encoded piece.
    fn bpe_piece(&self, text: &str) -> Vec<TokenId> {
        let char_indices: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let mut symbols: Vec<Symbol> = Vec::with_capacity(char_indices.len());
        for (i, &start) in char_indices.iter().enumerate() {
            let end = char_indices.get(i + 1).copied().unwrap_or(text.len());
            symbols.push(Symbol {
                start,
                len: end - start,
                prev: i.checked_sub(1),
                next: if i + 1 < char_indices.len() {
                    Some(i + 1)
                } else {
                    None
                },
            });
        }
        if symbols.is_empty() {
            return Vec::new();
        }

        let mut queue = BinaryHeap::new();
        let mut key = String::new();
        for i in 0..symbols.len().saturating_sub(1) {
            self.try_add_bigram(i, i + 1, text, &symbols, &mut queue, &mut key);
        }

        while let Some(bigram) = queue.pop() {
            let (left, right) = (bigram.left, bigram.right);

            // The queue may hold stale entries: symbols merge away or
            // change text after insertion. Revalidate before applying.
            if symbols[left].len == 0
                || symbols[right].len == 0
                || symbols[left].next != Some(right)
            {
                continue;
            }
            match self.rank_of(text, &symbols[left], &symbols[right], &mut key) {
                Some(rank) if rank == bigram.rank => {}
                _ => continue,
            }

            // Extend left over right; right becomes a tombstone.
            symbols[left].len += symbols[right].len;
            symbols[right].len = 0;
            symbols[left].next = symbols[right].next;
            if let Some(next) = symbols[right].next {
                symbols[next].prev = Some(left);
            }

            if let Some(prev) = symbols[left].prev {
                self.try_add_bigram(prev, left, text, &symbols, &mut queue, &mut key);
            }
            if let Some(next) = symbols[left].next {
                self.try_add_bigram(left, next, text, &symbols, &mut queue, &mut key);
            }
        }

        let mut ids = Vec::new();
        for symbol in &symbols {
            if symbol.len == 0 {
                continue;
            }
            let piece = &text[symbol.start..symbol.start + symbol.len];
            // A piece missing from the vocab is silently dropped; with a
            // byte-complete vocabulary this does not arise.
            if let Some(id) = self.vocab.get(piece) {
                ids.push(id);
            }
        }
        ids
    }

    /// Segment one pre-tokenized piece, consulting the cache first.
    fn encode_piece(&self, piece: &str) -> Vec<TokenId> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(ids) = cache.get(piece) {
                return ids.clone();
            }
        }
        let encoded = byte_encoder::encode_bytes(piece);
        let ids = self.bpe_piece(&encoded);
        if let Ok(mut cache) = self.cache.lock() {
            if cache.len() < CACHE_MAX_ENTRIES {
                cache.insert(piece.to_string(), ids.clone());
            }
        }
        ids
    }

    pub fn encode(&self, text: &str) -> Result<Vec<TokenId>, Error> {
        if text.len() > crate::MAX_INPUT_SIZE {
            return Err(Error::TokenizationFailed(format!(
                "input text too large: {} bytes (max: {})",
                text.len(),
                crate::MAX_INPUT_SIZE
            )));
        }
        let mut result = Vec::new();
        for piece in self.pre_tokenize(text)? {
            let ids = self.encode_piece(piece);
            if result.len() + ids.len() > crate::MAX_OUTPUT_TOKENS {
                return Err(Error::TokenizationFailed(format!(
                    "output would exceed max tokens: {} (max: {})",
                    result.len() + ids.len(),
                    crate::MAX_OUTPUT_TOKENS
                )));
            }
            result.extend(ids);
        }
        Ok(result)
    }

    pub fn decode(&self, ids: &[TokenId]) -> Result<String, Error> {
        let mut encoded = String::new();
        for &id in ids {
            let piece = self
                .vocab
                .token_of(id)
                .ok_or(Error::InvalidToken(id))?;
            encoded.push_str(piece);
        }
        Ok(byte_encoder::decode_bytes(&encoded))
    }

    pub fn vocab(&self) -> &BpeVocab {
        &self.vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::parse_merges;

    /// Vocab with every single byte-image codepoint plus the given merged
    /// tokens; ids follow insertion order.
    fn byte_complete_vocab(extra: &[&str]) -> BpeVocab {
        let mut entries = Vec::new();
        for &c in byte_encoder::byte_to_char().iter() {
            entries.push(c.to_string());
        }
        entries.extend(extra.iter().map(|s| s.to_string()));
        let json = serde_json::Value::Object(
            entries
                .iter()
                .enumerate()
                .map(|(i, t)| (t.clone(), serde_json::Value::from(i as u64)))
                .collect(),
        );
        BpeVocab::from_json(&json.to_string()).unwrap()
    }

    fn engine(extra: &[&str], merges: &str) -> BpeTokenizer {
        BpeTokenizer::from_parts(byte_complete_vocab(extra), parse_merges(merges).unwrap())
            .unwrap()
    }

    #[test]
    fn test_pre_tokenize_words_and_spaces() {
        let bpe = engine(&[], "");
        let pieces = bpe.pre_tokenize("The quick brown fox").unwrap();
        assert_eq!(pieces, vec!["The", " quick", " brown", " fox"]);
    }

    #[test]
    fn test_pre_tokenize_contractions() {
        let bpe = engine(&[], "");
        let pieces = bpe.pre_tokenize("don't stop").unwrap();
        assert_eq!(pieces, vec!["don", "'t", " stop"]);
    }

    #[test]
    fn test_pre_tokenize_trailing_whitespace() {
        let bpe = engine(&[], "");
        // `\s+(?!\S)` claims trailing whitespace in one match.
        assert_eq!(bpe.pre_tokenize("a  ").unwrap(), vec!["a", "  "]);
        // Interior runs leave the last space attached to the next word.
        assert_eq!(bpe.pre_tokenize("a  b").unwrap(), vec!["a", " ", " b"]);
    }

    #[test]
    fn test_merges_apply_in_rank_order() {
        let bpe = engine(&["ab", "abc"], "a b\nab c\n");
        let ids = bpe.encode("abc").unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(bpe.decode(&ids).unwrap(), "abc");
    }

    #[test]
    fn test_lower_rank_wins_over_position() {
        // "bc" outranks "ab": "abc" becomes a + bc, not ab + c.
        let bpe = engine(&["bc", "ab"], "b c\na b\n");
        let ids = bpe.encode("abc").unwrap();
        assert_eq!(ids.len(), 2);
        let a_id = bpe.vocab().get("a").unwrap();
        let bc_id = bpe.vocab().get("bc").unwrap();
        assert_eq!(ids, vec![a_id, bc_id]);
    }

    #[test]
    fn test_no_merges_yields_byte_symbols() {
        let bpe = engine(&[], "");
        let ids = bpe.encode("hi").unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(bpe.decode(&ids).unwrap(), "hi");
    }

    #[test]
    fn test_roundtrip_with_spaces_and_unicode() {
        let bpe = engine(&[], "");
        for text in ["The quick brown fox", "tab\tnewline\n", "héllo 世界", ""] {
            let ids = bpe.encode(text).unwrap();
            assert_eq!(bpe.decode(&ids).unwrap(), text, "roundtrip of {text:?}");
        }
    }

    #[test]
    fn test_cache_hit_returns_same_ids() {
        let bpe = engine(&["ab"], "a b\n");
        let first = bpe.encode("ab ab").unwrap();
        let second = bpe.encode("ab ab").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_unknown_id_fails() {
        let bpe = engine(&[], "");
        let err = bpe.decode(&[999_999]).unwrap_err();
        assert!(matches!(err, Error::InvalidToken(999_999)));
    }
}
