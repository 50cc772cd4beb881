//! Vocabulary loading and lookup.
//!
//! Two formats live here: the line-based WordPiece vocabulary (one token
//! per line, line order assigns ids) and the BPE pair of files (JSON
//! token→id map plus an ordered merges list).

use crate::{Error, TokenId};
use std::collections::HashMap;
use std::path::Path;

const MAX_VOCAB_SIZE: usize = 1_000_000;
const MAX_TOKEN_LENGTH: usize = 1024;

/// Resolved ids of the structurally emitted special tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub pad: TokenId,
    pub unk: TokenId,
    pub cls: TokenId,
    pub sep: TokenId,
}

/// Ordered WordPiece token table with bidirectional lookup.
#[derive(Debug)]
pub struct Vocabulary {
    tokens: Vec<String>,
    token_to_id: HashMap<String, TokenId>,
    specials: SpecialTokens,
}

impl Vocabulary {
    /// Load a vocabulary from a one-token-per-line text file.
    ///
    /// Trailing whitespace is stripped, empty lines are skipped, and the
    /// running counter over non-empty lines assigns ids.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "cannot read vocab file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_contents(&contents)
    }

    pub fn from_contents(contents: &str) -> Result<Self, Error> {
        let mut tokens = Vec::new();
        for line in contents.lines() {
            let token = line.trim_end();
            if token.is_empty() {
                continue;
            }
            tokens.push(token.to_string());
        }
        Self::from_tokens(tokens)
    }

    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, Error> {
        if tokens.is_empty() {
            return Err(Error::Format("vocabulary is empty".to_string()));
        }
        if tokens.len() > MAX_VOCAB_SIZE {
            return Err(Error::Format(format!(
                "vocabulary too large: {} tokens (max: {})",
                tokens.len(),
                MAX_VOCAB_SIZE
            )));
        }
        for (i, token) in tokens.iter().enumerate() {
            if token.len() > MAX_TOKEN_LENGTH {
                return Err(Error::Format(format!(
                    "token {} too large: {} bytes (max: {})",
                    i,
                    token.len(),
                    MAX_TOKEN_LENGTH
                )));
            }
        }

        let mut token_to_id = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            token_to_id.insert(token.clone(), i as TokenId);
        }
        if token_to_id.len() != tokens.len() {
            return Err(Error::Format(format!(
                "duplicate tokens found: {} unique out of {} total",
                token_to_id.len(),
                tokens.len()
            )));
        }

        let lookup = |name: &str| -> Result<TokenId, Error> {
            token_to_id
                .get(name)
                .copied()
                .ok_or_else(|| Error::Config(format!("vocabulary is missing {name}")))
        };
        let specials = SpecialTokens {
            pad: lookup("[PAD]")?,
            unk: lookup("[UNK]")?,
            cls: lookup("[CLS]")?,
            sep: lookup("[SEP]")?,
        };

        log::debug!("loaded vocabulary: {} tokens", tokens.len());
        Ok(Self {
            tokens,
            token_to_id,
            specials,
        })
    }

    /// Token → id, with a caller-supplied default for missing tokens.
    pub fn id_of(&self, token: &str, default: TokenId) -> TokenId {
        self.token_to_id.get(token).copied().unwrap_or(default)
    }

    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    /// Id → token text.
    pub fn token_of(&self, id: TokenId) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn specials(&self) -> SpecialTokens {
        self.specials
    }

    pub fn is_special(&self, id: TokenId) -> bool {
        id == self.specials.pad
            || id == self.specials.unk
            || id == self.specials.cls
            || id == self.specials.sep
    }

    /// Iterate `(id, token)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (i as TokenId, t.as_str()))
    }
}

/// BPE vocabulary: JSON token→id map plus the inverted decoder table.
pub struct BpeVocab {
    token_to_id: HashMap<String, TokenId>,
    id_to_token: HashMap<TokenId, String>,
}

impl BpeVocab {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "cannot read BPE vocab file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, Error> {
        let value: serde_json::Value = serde_json::from_str(contents)
            .map_err(|e| Error::Format(format!("BPE vocab is not valid JSON: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Format("BPE vocab must be a JSON object".to_string()))?;

        let mut token_to_id = HashMap::with_capacity(object.len());
        let mut id_to_token = HashMap::with_capacity(object.len());
        for (token, id_value) in object {
            let id = id_value.as_u64().ok_or_else(|| {
                Error::Format(format!(
                    "BPE vocab id for {token:?} must be a non-negative integer"
                ))
            })?;
            let id = TokenId::try_from(id).map_err(|_| {
                Error::Format(format!("BPE vocab id for {token:?} out of range: {id}"))
            })?;
            if id_to_token.insert(id, token.clone()).is_some() {
                return Err(Error::Format(format!("duplicate BPE vocab id: {id}")));
            }
            token_to_id.insert(token.clone(), id);
        }
        if token_to_id.is_empty() {
            return Err(Error::Format("BPE vocabulary is empty".to_string()));
        }

        log::debug!("loaded BPE vocabulary: {} tokens", token_to_id.len());
        Ok(Self {
            token_to_id,
            id_to_token,
        })
    }

    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.token_to_id.get(token).copied()
    }

    pub fn token_of(&self, id: TokenId) -> Option<&str> {
        self.id_to_token.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }
}

/// Load an ordered merges list.
///
/// Blank lines and `#` comments are skipped; each remaining line must be
/// exactly two whitespace-separated tokens. Rank is the 0-based order of
/// appearance among the kept lines.
pub fn load_merges<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>, Error> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "cannot read merges file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    parse_merges(&contents)
}

pub fn parse_merges(contents: &str) -> Result<Vec<(String, String)>, Error> {
    let mut merges = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(left), Some(right), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::Format(format!(
                "malformed merges line {}: expected exactly two tokens: {line:?}",
                line_no + 1
            )));
        };
        merges.push((left.to_string(), right.to_string()));
    }
    log::debug!("loaded merges: {} rules", merges.len());
    Ok(merges)
}
