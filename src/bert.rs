//! BERT tokenizer engine.
//!
//! Composes the normalizer and the WordPiece segmenter, brackets the ids
//! with `[CLS]`/`[SEP]`, enforces the effective max length with early
//! stop, and applies the padding mode. Bidirectional mode segments each
//! sub-word both ways and keeps the arbitration winner.

use crate::normalizer::Normalizer;
use crate::vocab::{SpecialTokens, Vocabulary};
use crate::wordpiece::{prefer_forward, WordPieceSegmenter};
use crate::{Error, Padding, TokenId, TokenizerConfig};
use rayon::prelude::*;
use std::path::Path;

pub struct BertTokenizer {
    vocab: Vocabulary,
    normalizer: Normalizer,
    segmenter: WordPieceSegmenter,
    specials: SpecialTokens,
    model_max_length: Option<usize>,
    bidirectional: bool,
}

impl BertTokenizer {
    pub fn from_vocab_file<P: AsRef<Path>>(
        path: P,
        config: &TokenizerConfig,
    ) -> Result<Self, Error> {
        let vocab = Vocabulary::from_file(path)?;
        Ok(Self::from_vocab(vocab, config))
    }

    pub fn from_vocab(vocab: Vocabulary, config: &TokenizerConfig) -> Self {
        let normalizer = Normalizer::new(config.do_lower_case, config.tokenize_cjk);
        let segmenter = WordPieceSegmenter::from_vocab(&vocab);
        let specials = vocab.specials();
        Self {
            vocab,
            normalizer,
            segmenter,
            specials,
            model_max_length: config.effective_max_length(),
            bidirectional: config.enable_bidirectional,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn specials(&self) -> SpecialTokens {
        self.specials
    }

    pub fn model_max_length(&self) -> Option<usize> {
        self.model_max_length
    }

    /// Effective max for one call: the argument, else the engine default,
    /// else unbounded.
    fn resolve_max(&self, max_length: Option<usize>) -> Option<usize> {
        max_length.or(self.model_max_length)
    }

    /// Normalize and segment `text` into `out` without special tokens,
    /// stopping once `out` holds `max_total` ids.
    pub(crate) fn encode_body(&self, text: &str, out: &mut Vec<TokenId>, max_total: usize) {
        if self.bidirectional {
            let mut fwd = Vec::new();
            let mut bwd = Vec::new();
            let mut stack = Vec::new();
            self.normalizer.for_each_subword(text, |word| {
                if out.len() >= max_total {
                    return false;
                }
                fwd.clear();
                bwd.clear();
                self.segmenter.forward(word.as_bytes(), &mut fwd, usize::MAX);
                self.segmenter
                    .backward(word.as_bytes(), &mut bwd, usize::MAX, &mut stack);
                let winner = if fwd == bwd || prefer_forward(&fwd, &bwd, self.specials) {
                    &fwd
                } else {
                    &bwd
                };
                for &id in winner {
                    if out.len() >= max_total {
                        break;
                    }
                    out.push(id);
                }
                out.len() < max_total
            });
        } else {
            self.normalizer.for_each_subword(text, |word| {
                if out.len() >= max_total {
                    return false;
                }
                self.segmenter.forward(word.as_bytes(), out, max_total);
                out.len() < max_total
            });
        }
    }

    /// Encode one text: `[CLS]`, sub-word ids up to `max − 1`, `[SEP]`,
    /// then optional padding to `max`.
    pub fn encode(&self, text: &str, padding: Padding, max_length: Option<usize>) -> Vec<TokenId> {
        let max = self.resolve_max(max_length);
        let budget = max.map_or(usize::MAX, |m| m.saturating_sub(1));
        let mut ids = Vec::with_capacity(max.unwrap_or(0).min(4096).max(16));
        ids.push(self.specials.cls);
        self.encode_body(text, &mut ids, budget);
        ids.push(self.specials.sep);
        if let Some(m) = max {
            ids.truncate(m);
            if padding == Padding::MaxLength {
                ids.resize(m, self.specials.pad);
            }
        }
        ids
    }

    /// Batch encode; order of outputs matches order of inputs.
    pub fn batch_encode(
        &self,
        texts: &[&str],
        padding: Padding,
        max_length: Option<usize>,
        parallel: bool,
    ) -> Vec<Vec<TokenId>> {
        if parallel {
            texts
                .par_iter()
                .map(|text| self.encode(text, padding, max_length))
                .collect()
        } else {
            texts
                .iter()
                .map(|text| self.encode(text, padding, max_length))
                .collect()
        }
    }

    /// The WordPiece pieces of `text`, without special tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut ids = Vec::new();
        self.encode_body(text, &mut ids, usize::MAX);
        ids.iter()
            .filter_map(|&id| self.vocab.token_of(id))
            .map(String::from)
            .collect()
    }

    /// Reconstruct text: `[PAD]`/`[CLS]`/`[SEP]` are skipped, `##` pieces
    /// join without a space, everything else is space-separated.
    pub fn decode(&self, ids: &[TokenId]) -> Result<String, Error> {
        let mut out = String::new();
        for &id in ids {
            if id == self.specials.pad || id == self.specials.cls || id == self.specials.sep {
                continue;
            }
            let token = self.vocab.token_of(id).ok_or(Error::InvalidToken(id))?;
            if let Some(rest) = token.strip_prefix("##") {
                out.push_str(rest);
            } else {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(token);
            }
        }
        Ok(out)
    }
}
